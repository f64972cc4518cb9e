//! Log setup for the command-line calculator.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to binaries, which call [`init_logging`] once at startup.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Name of the log file created in the log directory.
pub const LOG_FILE_NAME: &str = "factorio_calculator.log";

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber and returns the log file path.
///
/// Events are appended to [`LOG_FILE_NAME`] inside `log_dir`; with `console`
/// set they are mirrored to stderr. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init_logging(log_dir: &Path, console: bool) -> Result<PathBuf, LoggingError> {
    let path = log_dir.join(LOG_FILE_NAME);
    let io_error = |source| LoggingError::Io {
        file: path.clone(),
        source,
    };

    fs::create_dir_all(log_dir).map_err(io_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_error)?;

    let file_writer = Mutex::new(file);
    let writer = if console {
        BoxMakeWriter::new(file_writer.and(std::io::stderr))
    } else {
        BoxMakeWriter::new(file_writer)
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(path)
}
