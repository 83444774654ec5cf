//! Logging setup for the pantry review binaries.
//!
//! Two sinks: stderr for the operator and a daily-rolling file under the log
//! directory, written off the request path by a background worker. Old
//! files beyond [`KEEP_LOG_FILES`] are deleted on rollover.

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "pantry_web=info,pantry_security=info";
pub const KEEP_LOG_FILES: usize = 7;

pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Directory for the log file; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

/// Keeps the file writer flushing. Hold it until the process exits.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let base_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        base_filter.clone()
    };

    let mut guard = None;
    let file_layer = match &config.log_dir {
        Some(dir) => {
            let appender = file_appender(dir, config.app_name)
                .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(base_filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

/// `<dir>/<app_name>.<date>.log`, rolled daily.
fn file_appender(dir: &std::path::Path, app_name: &str) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_stem(app_name))
        .filename_suffix("log")
        .max_log_files(KEEP_LOG_FILES)
        .build(dir)?;
    Ok(appender)
}

/// `$PANTRY_HOME`, else `~/.pantry_review`.
pub fn pantry_home() -> PathBuf {
    if let Ok(home) = std::env::var("PANTRY_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pantry_review")
}

pub fn default_log_dir() -> PathBuf {
    pantry_home().join("logs")
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("pantry-web"), "pantry-web");
        assert_eq!(file_stem("pantry web/1"), "pantry_web_1");
    }

    #[test]
    fn test_file_appender_creates_dir_and_log_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("logs");
        let mut appender = file_appender(&dir, "pantry web").unwrap();
        appender.write_all(b"started\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("pantry_web."), "{}", names[0]);
        assert!(names[0].ends_with(".log"), "{}", names[0]);
    }
}
