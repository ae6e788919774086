//! Tracing subscriber setup for hosts.
//!
//! Logs always go to a file through a non-blocking writer. A console layer
//! on stderr can be added for headless runs; it is left off when a TUI owns
//! the terminal.
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Keeps the file writer flushing. Hold it until the program exits.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: WorkerGuard,
    path: PathBuf,
}

impl LoggingGuard {
    /// File the logs are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log file path {0}")]
    InvalidPath(PathBuf),

    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Default filter directive for the configured verbosity.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "compass=debug,compass_cli=debug"
    } else {
        "compass=info,compass_cli=info"
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(
    settings: &LoggingSettings,
    console: bool,
) -> Result<LoggingGuard, LoggingError> {
    let path = settings.file.clone();
    let (directory, file_name) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_owned()),
        _ => return Err(LoggingError::InvalidPath(settings.file.clone())),
    };

    if !directory.as_os_str().is_empty() {
        fs::create_dir_all(&directory).map_err(|source| LoggingError::CreateDir {
            path: directory.clone(),
            source,
        })?;
    }

    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(settings.debug)));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_timer(LocalTime::new(Rfc3339));

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(LocalTime::new(Rfc3339))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LoggingGuard {
        _file: guard,
        path,
    })
}
