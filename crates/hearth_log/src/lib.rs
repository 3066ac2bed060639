//! # Hearth Log
//!
//! Logging bootstrap for applications built on Hearth.
//!
//! Library crates only emit `tracing` events. Binaries call [`init`] once at
//! startup to install a formatting subscriber writing to standard error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hearth_log::{init, Level, LogConfig};
//!
//! init(&LogConfig::new().level(Level::Debug)).unwrap();
//! tracing::debug!("logging ready");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod sink;

pub use config::{Level, LogConfig};
pub use error::{LogError, LogResult};
pub use sink::{debug_sink, error_sink, fatal, warn_sink};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over [`LogConfig::level`].
///
/// # Errors
///
/// Returns [`LogError::AlreadyInitialized`] if a global subscriber is
/// already installed.
pub fn init(config: &LogConfig) -> LogResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.level))
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy()
}
