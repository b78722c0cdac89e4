use std::env;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";
const DEFAULT_LOG_FILE: &str = "logs/vb365-cleaner.log";

/// Console output for the operator plus a daily log file that keeps the
/// per-orphan audit trail of every run.
pub fn init_logger() -> WorkerGuard {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let log_file = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let (dir, prefix) = log_file_location(Path::new(&log_file));
    let file_appender = tracing_appender::rolling::daily(&dir, prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .compact()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::stdout().is_terminal()),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .with(EnvFilter::new(filter))
        .init();

    debug!("Logging to {}", dir.display());
    guard
}

/// Split a log file path into the directory and the file name prefix the
/// rolling appender expects. A bare name lands in the working directory.
fn log_file_location(path: &Path) -> (PathBuf, OsString) {
    let name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("vb365-cleaner.log"));
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_file_goes_under_logs() {
        let (dir, name) = log_file_location(Path::new(DEFAULT_LOG_FILE));
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(name, OsString::from("vb365-cleaner.log"));
    }

    #[test]
    fn test_bare_file_name_uses_working_directory() {
        let (dir, name) = log_file_location(Path::new("cleaner.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("cleaner.log"));
    }

    #[test]
    fn test_directory_only_path_gets_default_name() {
        let (dir, name) = log_file_location(Path::new("/var/log/vb365/.."));
        assert_eq!(dir, PathBuf::from("/var/log/vb365"));
        assert_eq!(name, OsString::from("vb365-cleaner.log"));
    }
}
