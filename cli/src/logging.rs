//! Console and daily-file logging.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingSection;

/// Path of the log file for `date` inside `dir`.
#[must_use]
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y%m%d")))
}

/// Filter built from `RUST_LOG`, or from `level` when the variable is unset.
///
/// HTTP client internals are held at `warn` either way.
#[must_use]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level))
        .add_directive(quiet("hyper"))
        .add_directive(quiet("reqwest"))
}

fn quiet(target: &str) -> tracing_subscriber::filter::Directive {
    format!("{target}=warn")
        .parse()
        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::WARN.into())
}

/// Creates `dir` and opens today's log file in append mode.
///
/// # Errors
///
/// Fails if the directory or the file cannot be created.
pub fn open_log_file(dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = log_file_path(dir, Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok((path, file))
}

/// Installs the global subscriber.
///
/// Console output goes to stderr so stdout stays free for command output.
/// With `to_file`, a plain-text layer also appends to
/// `<dir>/<YYYYMMDD>.log` and its path is returned.
///
/// # Errors
///
/// Fails if the log file cannot be created, or if a global subscriber is
/// already installed.
pub fn init(config: &LoggingSection, to_file: bool) -> Result<Option<PathBuf>> {
    let (path, file) = if to_file {
        let (path, file) = open_log_file(&config.dir)?;
        (Some(path), Some(file))
    } else {
        (None, None)
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_target(true)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert_eq!(
            log_file_path(Path::new("logs"), date),
            PathBuf::from("logs/20250420.log")
        );
    }

    #[test]
    fn log_file_is_created_under_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let (path, _file) = open_log_file(&logs).unwrap();

        assert!(path.starts_with(&logs));
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("log"));
    }

    #[test]
    fn filter_accepts_configured_level() {
        let filter = env_filter("debug");
        let printed = filter.to_string();
        assert!(printed.contains("hyper=warn"));
        assert!(printed.contains("reqwest=warn"));
    }
}
