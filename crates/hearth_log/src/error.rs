//! Error types for logging setup.

use thiserror::Error;

/// Result type for logging setup.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while configuring logging.
#[derive(Debug, Error)]
pub enum LogError {
    /// A level name was not recognized.
    #[error("invalid log level '{0}' (expected error, warn, info, debug or trace)")]
    InvalidLevel(String),

    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}
