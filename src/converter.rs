use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::collision_resolver::resolve_free_name;
use crate::content_probe::find_content_matches;
use crate::date_partitioner::{resolve_day_directory, DayDirectoryError};
use crate::device_profile::{DeviceProfile, SourceLayout};
use crate::report::Report;

/// The shared conversion engine. Walks one source dump, classifies every
/// entry against the profile's rules, places each media file under
/// `target/YYYYMM/YYYYMMDD` with content-based dedup, and records every
/// decision in the returned report.
pub struct Converter<'a> {
    profile: &'a DeviceProfile,
}

impl<'a> Converter<'a> {
    pub fn new(profile: &'a DeviceProfile) -> Self {
        Self { profile }
    }

    /// Runs the whole conversion. Fails only when the top-level source
    /// listing itself is unreadable; every per-entry problem becomes an
    /// ERROR line in the report and the run continues.
    pub fn execute(&self, source: &Path, target: &Path) -> Result<Report> {
        let mut report = Report::new();
        match self.profile.layout() {
            SourceLayout::Flat => self.convert_flat(source, target, &mut report)?,
            SourceLayout::DaySubdirectories { mismatch_hint, .. } => {
                self.convert_day_subdirectories(source, target, mismatch_hint, &mut report)?
            }
        }
        Ok(report)
    }

    /// Flat layout: every direct child of the source root must be a media
    /// file carrying its own date. The root is deleted once it is empty.
    fn convert_flat(&self, source: &Path, target: &Path, report: &mut Report) -> Result<()> {
        for entry in list_entries(source)? {
            if entry.is_dir() {
                report.error(format!("file {} is a directory, skipped", entry.display()));
                continue;
            }
            let name = file_name_of(&entry);
            if self.profile.ignorable().matches(&name) {
                self.delete_file(&entry, format!("file {} deleted", entry.display()), report);
                continue;
            }
            let Some(date) = self.profile.match_media_date(&name) else {
                report.error(format!(
                    "file {} {}, skipped",
                    entry.display(),
                    self.profile.media_mismatch_hint()
                ));
                continue;
            };
            let day_directory = match resolve_day_directory(target, &date) {
                Ok(dir) => dir,
                Err(e) => {
                    report_day_directory_error(&e, &entry, report);
                    continue;
                }
            };
            self.place(&entry, &name, &day_directory, report);
        }
        self.cleanup_container(source, report);
        Ok(())
    }

    /// Day-subdirectory layout: direct children of the source root are
    /// `YYYY_MM_DD`-style directories whose names carry the date; the
    /// files inside are classified one by one. Each emptied day directory
    /// is deleted; the source root itself is left alone.
    fn convert_day_subdirectories(
        &self,
        source: &Path,
        target: &Path,
        day_mismatch_hint: &str,
        report: &mut Report,
    ) -> Result<()> {
        for day_source in list_entries(source)? {
            if !day_source.is_dir() {
                report.error(format!(
                    "file {} is not a directory, skipped",
                    day_source.display()
                ));
                continue;
            }
            let directory_name = file_name_of(&day_source);
            let Some(date) = self.profile.match_day_directory(&directory_name) else {
                report.error(format!(
                    "directory {} {}, skipped",
                    day_source.display(),
                    day_mismatch_hint
                ));
                continue;
            };
            let day_directory = match resolve_day_directory(target, &date) {
                Ok(dir) => dir,
                Err(e) => {
                    report_day_directory_error(&e, &day_source, report);
                    continue;
                }
            };
            let files = match list_entries(&day_source) {
                Ok(files) => files,
                Err(_) => {
                    report.error(format!(
                        "directory {} could not be listed, skipped",
                        day_source.display()
                    ));
                    continue;
                }
            };
            for file in files {
                let file_name = file_name_of(&file);
                if self.profile.ignorable().matches(&file_name) {
                    self.delete_file(&file, format!("file {} deleted", file.display()), report);
                } else if file.is_file() && self.profile.is_valid_media(&file_name) {
                    self.place(&file, &file_name, &day_directory, report);
                } else {
                    report.error(format!("unexpected file {}, skipped", file.display()));
                }
            }
            self.cleanup_container(&day_source, report);
        }
        Ok(())
    }

    /// Places one media file into its resolved day directory: dedup by
    /// content first, then move under the original name or a free variant.
    fn place(&self, source_file: &Path, name: &str, day_directory: &Path, report: &mut Report) {
        let matches = match find_content_matches(day_directory, source_file) {
            Ok(matches) => matches,
            Err(_) => {
                report.error(format!(
                    "file {} could not be compared against {}, skipped",
                    source_file.display(),
                    day_directory.display()
                ));
                return;
            }
        };
        let match_names: Vec<String> = matches.iter().map(|path| file_name_of(path)).collect();
        if match_names.iter().any(|matched| matched == name) {
            self.delete_file(
                source_file,
                format!(
                    "file {} deleted because target exists with same content and name",
                    source_file.display()
                ),
                report,
            );
        } else if !match_names.is_empty() {
            let mut names = match_names;
            names.sort();
            self.delete_file(
                source_file,
                format!(
                    "file {} deleted because target exists with same content and different name [{}]",
                    source_file.display(),
                    names.join(", ")
                ),
                report,
            );
        } else if day_directory.join(name).exists() {
            let free_name = match resolve_free_name(day_directory, name) {
                Ok(free_name) => free_name,
                Err(e) => {
                    report.error(format!("file {} skipped: {}", source_file.display(), e));
                    return;
                }
            };
            let destination = day_directory.join(free_name);
            self.move_file(
                source_file,
                &destination,
                format!(
                    "file {} moved into {} because source name was in use in target with different content",
                    source_file.display(),
                    destination.display()
                ),
                report,
            );
        } else {
            let destination = day_directory.join(name);
            self.move_file(
                source_file,
                &destination,
                format!(
                    "file {} moved into {}",
                    source_file.display(),
                    destination.display()
                ),
                report,
            );
        }
    }

    /// Deletes the container when it has been fully emptied, otherwise
    /// reports what is still in it and leaves it standing.
    fn cleanup_container(&self, directory: &Path, report: &mut Report) {
        let remaining = match list_entries(directory) {
            Ok(remaining) => remaining,
            Err(_) => {
                report.error(format!(
                    "directory {} could not be listed",
                    directory.display()
                ));
                return;
            }
        };
        if remaining.is_empty() {
            let message = format!(
                "there was no file remaining in directory {}",
                directory.display()
            );
            match fs::remove_dir(directory) {
                Ok(()) => report.ok(message),
                Err(_) => report.error(format!(
                    "unsuccessful attempt to perform delete with success message: {}",
                    message
                )),
            }
        } else {
            let names: Vec<String> = remaining.iter().map(|path| file_name_of(path)).collect();
            report.error(format!(
                "preserving directory {}, there are remaining files [{}]",
                directory.display(),
                names.join(", ")
            ));
        }
    }

    fn delete_file(&self, file: &Path, success_message: String, report: &mut Report) {
        match fs::remove_file(file) {
            Ok(()) => report.ok(success_message),
            Err(_) => report.error(format!(
                "unsuccessful attempt to perform delete with success message: {}",
                success_message
            )),
        }
    }

    fn move_file(&self, source: &Path, destination: &Path, success_message: String, report: &mut Report) {
        match move_across(source, destination) {
            Ok(()) => report.ok(success_message),
            Err(_) => report.error(format!(
                "unsuccessful attempt to perform move with success message: {}",
                success_message
            )),
        }
    }
}

/// Rename, falling back to copy+remove when source and target sit on
/// different filesystems.
fn move_across(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
    }
}

/// Direct children of `dir` in the order the OS returns them. There is
/// no sorting; the report reflects raw listing order.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    let listing = fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in listing {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        entries.push(entry.path());
    }
    Ok(entries)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn report_day_directory_error(error: &DayDirectoryError, entry: &Path, report: &mut Report) {
    let reason = match error {
        DayDirectoryError::Conflict(_) => "exists but is not a directory",
        DayDirectoryError::CreateFailed(..) => "could not be created",
    };
    report.error(format!(
        "target {} for file {} {}, skipped",
        error.path().display(),
        entry.display(),
        reason
    ));
}
