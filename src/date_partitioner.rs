use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Calendar date captured from a device naming pattern, kept as the
/// digit strings the pattern matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDate {
    year: String,
    month: String,
    day: String,
}

impl CaptureDate {
    pub fn new(year: &str, month: &str, day: &str) -> Self {
        Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        }
    }

    /// Month partition name: `YYYYMM`
    pub fn month_directory(&self) -> String {
        format!("{}{}", self.year, self.month)
    }

    /// Day partition name: `YYYYMMDD`
    pub fn day_directory(&self) -> String {
        format!("{}{}{}", self.year, self.month, self.day)
    }
}

/// Why a month or day partition could not be resolved. Either way the
/// candidate that needed it is abandoned in place.
#[derive(Debug)]
pub enum DayDirectoryError {
    /// The path exists but is not a directory
    Conflict(PathBuf),
    /// The directory was absent and could not be created
    CreateFailed(PathBuf, io::Error),
}

impl DayDirectoryError {
    /// The target path the candidate collided with
    pub fn path(&self) -> &Path {
        match self {
            DayDirectoryError::Conflict(path) => path,
            DayDirectoryError::CreateFailed(path, _) => path,
        }
    }
}

impl fmt::Display for DayDirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayDirectoryError::Conflict(path) => {
                write!(f, "target {} exists but is not a directory", path.display())
            }
            DayDirectoryError::CreateFailed(path, _) => {
                write!(f, "target {} could not be created", path.display())
            }
        }
    }
}

impl std::error::Error for DayDirectoryError {}

/// Resolves `target_root/YYYYMM/YYYYMMDD` for `date`, creating each
/// level on demand. Creation is one level at a time, never recursive.
pub fn resolve_day_directory(
    target_root: &Path,
    date: &CaptureDate,
) -> Result<PathBuf, DayDirectoryError> {
    let month_dir = ensure_directory(target_root, &date.month_directory())?;
    ensure_directory(&month_dir, &date.day_directory())
}

fn ensure_directory(parent: &Path, name: &str) -> Result<PathBuf, DayDirectoryError> {
    let dir = parent.join(name);
    if dir.exists() {
        if dir.is_dir() {
            return Ok(dir);
        }
        return Err(DayDirectoryError::Conflict(dir));
    }
    match fs::create_dir(&dir) {
        Ok(()) => Ok(dir),
        Err(e) => Err(DayDirectoryError::CreateFailed(dir, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn setup(test_name: &str) -> PathBuf {
        let dir = PathBuf::from("/tmp").join(test_name);
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_partition_names_are_plain_concatenation() {
        // Arrange
        let date = CaptureDate::new("2015", "12", "10");

        // Act & Assert
        assert_eq!(date.month_directory(), "201512");
        assert_eq!(date.day_directory(), "20151210");
    }

    #[test]
    fn test_resolve_creates_both_levels() {
        // Arrange
        let target = setup("test_partition_create");
        let date = CaptureDate::new("2015", "12", "10");

        // Act
        let day_dir = resolve_day_directory(&target, &date).unwrap();

        // Assert
        assert_eq!(day_dir, target.join("201512").join("20151210"));
        assert!(day_dir.is_dir());

        // Cleanup
        fs::remove_dir_all(&target).ok();
    }

    #[test]
    fn test_resolve_is_idempotent() {
        // Arrange
        let target = setup("test_partition_idempotent");
        let date = CaptureDate::new("2015", "12", "10");

        // Act
        let first = resolve_day_directory(&target, &date).unwrap();
        let second = resolve_day_directory(&target, &date).unwrap();

        // Assert
        assert_eq!(first, second);

        // Cleanup
        fs::remove_dir_all(&target).ok();
    }

    #[test]
    fn test_month_level_conflict_is_reported() {
        // Arrange: 201512 exists as a plain file
        let target = setup("test_partition_month_conflict");
        fs::write(target.join("201512"), b"not a dir").unwrap();
        let date = CaptureDate::new("2015", "12", "10");

        // Act
        let result = resolve_day_directory(&target, &date);

        // Assert
        match result {
            Err(DayDirectoryError::Conflict(path)) => {
                assert_eq!(path, target.join("201512"));
            }
            other => panic!("expected a conflict, got {:?}", other),
        }

        // Cleanup
        fs::remove_dir_all(&target).ok();
    }

    #[test]
    fn test_day_level_conflict_is_reported() {
        // Arrange: month exists, day exists as a plain file
        let target = setup("test_partition_day_conflict");
        fs::create_dir(target.join("201512")).unwrap();
        fs::write(target.join("201512").join("20151210"), b"not a dir").unwrap();
        let date = CaptureDate::new("2015", "12", "10");

        // Act
        let result = resolve_day_directory(&target, &date);

        // Assert
        match result {
            Err(DayDirectoryError::Conflict(path)) => {
                assert_eq!(path, target.join("201512").join("20151210"));
            }
            other => panic!("expected a conflict, got {:?}", other),
        }

        // Cleanup
        fs::remove_dir_all(&target).ok();
    }

    #[test]
    fn test_missing_target_root_is_a_create_failure() {
        // Arrange: creation is single-level, so an absent root cannot be bridged
        let target = setup("test_partition_missing_root");
        let absent_root = target.join("absent");
        let date = CaptureDate::new("2015", "12", "10");

        // Act
        let result = resolve_day_directory(&absent_root, &date);

        // Assert
        match result {
            Err(DayDirectoryError::CreateFailed(path, _)) => {
                assert_eq!(path, absent_root.join("201512"));
            }
            other => panic!("expected a create failure, got {:?}", other),
        }

        // Cleanup
        fs::remove_dir_all(&target).ok();
    }
}
