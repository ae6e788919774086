//! CLI error type.

use std::fmt;

use compass::config::ConfigError;
use compass::logging::LoggingError;

/// Errors surfaced to the user by `compass` commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or unreadable configuration.
    Config(String),
    /// Filesystem or terminal I/O failure.
    Io(std::io::Error),
    /// The engine thread or runtime could not be started or stopped.
    Engine(String),
    /// Terminal UI failure.
    Tui(String),
    /// A replay input line could not be parsed.
    Replay { line: usize, message: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Tui(msg) => write!(f, "Terminal UI error: {}", msg),
            CliError::Replay { line, message } => {
                write!(f, "Replay input line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Config(format!("Failed to initialize logging: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_error_names_line() {
        let err = CliError::Replay {
            line: 7,
            message: "invalid azimuth 'x'".to_string(),
        };
        assert_eq!(err.to_string(), "Replay input line 7: invalid azimuth 'x'");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::UnknownKey("a.b".to_string()).into();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("a.b")));
    }
}
