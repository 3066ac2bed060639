//! Store fixtures.
//!
//! Provides stores rooted in a temporary directory that is removed when the
//! fixture is dropped.

use hearth_fs::{Filesystem, Umask};
use hearth_store::{Store, StoreOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A store living in its own temporary directory.
pub struct StoreFixture {
    /// The store instance.
    pub store: Store,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl StoreFixture {
    /// Creates a store with caching disabled.
    pub fn new() -> Self {
        Self::with_cache(0)
    }

    /// Creates a store with a read cache of `cache_size` bytes.
    pub fn with_cache(cache_size: u64) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let options = StoreOptions::new()
            .path(temp_dir.path().join("store"))
            .cache_size(cache_size);
        let store = Store::new(options, Self::filesystem());

        Self { store, temp_dir }
    }

    /// Opens a second store on the same base directory.
    ///
    /// The two stores share nothing but the disk and the lock, like two
    /// processes would.
    pub fn reopen(&self) -> Store {
        Store::new(self.options(), Self::filesystem())
    }

    /// Returns the options the fixture store was opened with, cache disabled.
    pub fn options(&self) -> StoreOptions {
        StoreOptions::new().path(self.base()).cache_size(0)
    }

    /// Returns the store base directory.
    pub fn base(&self) -> PathBuf {
        self.temp_dir.path().join("store")
    }

    /// Returns the temporary directory holding the store.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the on-disk path of the record named `name`.
    pub fn record_path(&self, name: &str) -> PathBuf {
        let key = Store::digest(name);
        let mut path = self.base();
        path.extend(hearth_store::transform(&key));
        path.push(&key);
        path
    }

    fn filesystem() -> Filesystem {
        Filesystem::with_umask(Umask::DEFAULT)
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for StoreFixture {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for StoreFixture {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test with a temporary store.
///
/// # Example
///
/// ```rust,ignore
/// use hearth_testkit::with_temp_store;
///
/// #[test]
/// fn my_test() {
///     with_temp_store(|store| {
///         store.write("a", b"1").unwrap();
///     });
/// }
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store) -> R,
{
    let mut fixture = StoreFixture::new();
    f(&mut fixture.store)
}

/// Creates a store pre-populated with `count` records named `record-<i>`.
pub fn populated_store(count: usize) -> StoreFixture {
    let mut fixture = StoreFixture::new();
    fixture.store.lock().expect("Failed to lock store");
    for i in 0..count {
        let name = format!("record-{i}");
        let data = format!(r#"{{"index":{i}}}"#).into_bytes();
        fixture
            .store
            .write(&name, &data)
            .expect("Failed to write record");
    }
    fixture.store.unlock().expect("Failed to unlock store");
    fixture
}
