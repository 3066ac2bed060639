//! Store configuration.

use std::path::PathBuf;

/// Default read cache budget in bytes (1 MiB).
pub const DEFAULT_CACHE_SIZE: u64 = 1024 * 1024;

/// Returns the default base directory: `<user cache dir>/hearth/store`.
///
/// Falls back to the system temporary directory when the platform reports no
/// cache directory.
#[must_use]
pub fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("hearth")
        .join("store")
}

/// Configuration for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Base directory holding the records and carrying the lock.
    pub path: PathBuf,

    /// Read cache budget in bytes (0 = caching disabled).
    pub cache_size: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: default_store_dir(),
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl StoreOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base directory.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the read cache budget in bytes.
    #[must_use]
    pub fn cache_size(mut self, bytes: u64) -> Self {
        self.cache_size = bytes;
        self
    }
}
