//! Tracing subscriber setup
//!
//! Human-readable events go to stderr. With a log file, events are also
//! written there as JSON lines through a non-blocking appender.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter directives for a `-v` count; dependencies stay at warn
pub fn directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,branch_diff={}", level)
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `verbosity`. The returned guard must be
/// held until exit so buffered file output is flushed.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let io_error = |source| LoggingError::Io {
                path: path.to_path_buf(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io_error)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "warn,branch_diff=info")]
    #[case(2, "warn,branch_diff=debug")]
    #[case(3, "warn,branch_diff=trace")]
    #[case(9, "warn,branch_diff=trace")]
    fn directives_follow_verbosity(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(directives(verbosity), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn directives_parse_as_env_filter(#[case] verbosity: u8) {
        assert!(EnvFilter::try_new(directives(verbosity)).is_ok());
    }
}
