mod collision_resolver;
mod content_probe;
mod converter;
mod date_partitioner;
mod device_profile;
mod report;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use converter::Converter;
use std::fs;
use std::path::{Path, PathBuf};

/// Reorganize a camera or phone media dump into a date-partitioned archive

#[derive(Parser, Debug)]
#[command(name = "organize-media")]
#[command(version, about, long_about = None)]
struct Args {
    /// Device profile to apply (canon1, huawei-xiaomi1, samsung1)
    profile: String,

    /// Source directory holding the media dump
    source: String,

    /// Target archive root (gains YYYYMM/YYYYMMDD subdirectories)
    target: String,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let profile = device_profile::find(&args.profile).ok_or_else(|| {
        anyhow!(
            "invalid profile {}, valid profiles are {:?}",
            args.profile,
            device_profile::names()
        )
    })?;
    let source = existing_directory(&args.source, "source")?;
    let target = existing_directory(&args.target, "target")?;

    println!("Converting {} to {}", source.display(), target.display());

    let converter = Converter::new(&profile);
    let report = converter.execute(&source, &target)?;
    for line in report.lines() {
        println!("{}", line.render());
    }

    let log_path = write_log(&report, profile.name(), &source, &target)?;
    println!(
        "Converted {} to {} and logged into {}.",
        source.display(),
        target.display(),
        log_path.display()
    );

    Ok(())
}

fn existing_directory(raw: &str, role: &str) -> Result<PathBuf> {
    let path = PathBuf::from(raw);
    if !path.is_dir() {
        bail!(
            "the {} location {} doesn't exist or is not a directory",
            role,
            path.display()
        );
    }
    Ok(path)
}

/// Persists the report as `<profile>-<timestamp>.log` in the target root
fn write_log(
    report: &report::Report,
    profile_name: &str,
    source: &Path,
    target: &Path,
) -> Result<PathBuf> {
    let log_name = format!(
        "{}-{}.log",
        profile_name,
        Local::now().format("%Y%m%d-%H%M%S")
    );
    let log_path = target.join(log_name);
    fs::write(&log_path, report.render_log(source, target))
        .with_context(|| format!("failed to write log file {}", log_path.display()))?;
    Ok(log_path)
}
