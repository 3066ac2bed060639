//! The locked key-value store.

use crate::cache::ReadCache;
use crate::config::StoreOptions;
use crate::error::{StoreError, StoreOp, StoreResult};
use crate::key::{digest, record_path};
use crate::keys::Keys;
use hearth_fs::{
    validate_path_component, Filesystem, LockHandle, LockMode, DIR_PERMISSIONS_PRIVATE,
    FILE_PERMISSIONS_PRIVATE,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Lock ownership of a [`Store`].
#[derive(Debug)]
enum LockState {
    Unlocked,
    Locked { mode: LockMode, handle: LockHandle },
}

/// A disk-backed key-value store.
///
/// Records are addressed by name; names are hashed with [`digest`] before
/// touching the disk. All access is serialized by an advisory lock on the
/// base directory, shared for reads and exclusive for writes.
///
/// # Locking
///
/// Unless the store is already locked, every operation acquires the lock it
/// needs and releases it before returning. A lock taken explicitly with
/// [`Store::lock`], [`Store::write_lock`] or [`Store::read_only_lock`] is
/// owned by the caller: operations run under it without touching it, and
/// only [`Store::unlock`] releases it.
///
/// Acquisition blocks with no timeout. A caller that needs a deadline must
/// enforce it from another thread.
///
/// # Caching
///
/// Reads populate a bounded in-memory cache that writes and deletes through
/// this store invalidate. Writes from other processes are not observed by
/// cached entries; set [`StoreOptions::cache_size`] to zero when several
/// processes write to the same store.
///
/// # Thread Safety
///
/// Operations take `&mut self`. Use one `Store` per base directory per
/// process; the lock coordinates between processes.
#[derive(Debug)]
pub struct Store {
    base: PathBuf,
    fs: Filesystem,
    cache: ReadCache,
    state: LockState,
}

impl Store {
    /// Creates a store rooted at `options.path`.
    ///
    /// Nothing is touched on disk until the first lock acquisition, which
    /// creates the base directory if needed.
    #[must_use]
    pub fn new(options: StoreOptions, fs: Filesystem) -> Self {
        Self {
            base: options.path,
            fs,
            cache: ReadCache::new(options.cache_size),
            state: LockState::Unlocked,
        }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Returns the mode of the held lock, if any.
    #[must_use]
    pub fn lock_mode(&self) -> Option<LockMode> {
        match &self.state {
            LockState::Unlocked => None,
            LockState::Locked { mode, .. } => Some(*mode),
        }
    }

    /// Returns true if this store currently holds a lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    /// Returns the number of record bytes held in the read cache.
    #[must_use]
    pub fn cached_bytes(&self) -> u64 {
        self.cache.used()
    }

    /// Returns the storage key for `name`.
    #[must_use]
    pub fn digest(name: &str) -> String {
        digest(name)
    }

    /// Returns true if a record named `name` exists.
    ///
    /// # Errors
    ///
    /// Fails only if the lock cannot be acquired or released.
    pub fn has(&mut self, name: &str) -> StoreResult<bool> {
        let key = digest(name);
        self.with_lock(LockMode::Shared, |store| {
            Ok(store.cache.contains(&key) || record_path(&store.base, &key).is_file())
        })
    }

    /// Reads the record named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the record cannot be read, including when
    /// it does not exist ([`StoreError::is_not_found`]), or a lock error.
    pub fn read(&mut self, name: &str) -> StoreResult<Vec<u8>> {
        let key = digest(name);
        self.read_key(&key)
    }

    /// Reads a record by storage key, bypassing hashing.
    ///
    /// Meant for keys obtained from [`Store::keys`] or [`Store::digest`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Fs`] if `key` is not a valid file name, and
    /// otherwise the same errors as [`Store::read`].
    pub fn read_from_key(&mut self, key: &str) -> StoreResult<Vec<u8>> {
        validate_path_component(key)?;
        self.read_key(key)
    }

    /// Writes `value` as the record named `name`, replacing any previous one.
    ///
    /// The record is replaced atomically: on failure the previous content
    /// stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] or [`StoreError::Fs`] on I/O failure,
    /// or a lock error.
    #[instrument(skip(self, value), fields(bytes = value.len()), level = "debug")]
    pub fn write(&mut self, name: &str, value: &[u8]) -> StoreResult<()> {
        let key = digest(name);
        self.with_lock(LockMode::Exclusive, |store| {
            let path = record_path(&store.base, &key);
            if let Some(parent) = path.parent() {
                store
                    .fs
                    .create_dir_all(parent, DIR_PERMISSIONS_PRIVATE)
                    .map_err(|source| StoreError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }

            store.cache.remove(&key);
            store.fs.write_file(&path, value, FILE_PERMISSIONS_PRIVATE)?;
            debug!(%key, "record written");
            Ok(())
        })
    }

    /// Removes the record named `name`.
    ///
    /// Key directories left empty are removed too.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the record cannot be removed, including
    /// when it does not exist, or a lock error.
    #[instrument(skip(self), level = "debug")]
    pub fn delete(&mut self, name: &str) -> StoreResult<()> {
        let key = digest(name);
        self.with_lock(LockMode::Exclusive, |store| {
            store.cache.remove(&key);
            let path = record_path(&store.base, &key);
            fs::remove_file(&path).map_err(|e| StoreError::io(StoreOp::Delete, key.as_str(), e))?;
            store.prune_empty_dirs(&path);
            debug!(%key, "record deleted");
            Ok(())
        })
    }

    /// Moves the record `old_name` to `new_name`.
    ///
    /// Runs read, write and delete under a single exclusive lock. The sequence
    /// is not atomic: a crash after the write leaves the content under both
    /// names. Renaming a record to its own name only checks that it exists.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    #[instrument(skip(self), level = "debug")]
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> StoreResult<()> {
        self.with_lock(LockMode::Exclusive, |store| {
            let content = store.read(old_name)?;
            if old_name == new_name {
                return Ok(());
            }
            store.write(new_name, &content)?;
            store.delete(old_name)
        })
    }

    /// Returns a lazy iterator over every storage key in the store.
    ///
    /// No lock is taken; see [`Keys`].
    #[must_use]
    pub fn keys(&self) -> Keys {
        Keys::new(&self.base)
    }

    /// Acquires an exclusive lock; alias of [`Store::write_lock`].
    ///
    /// # Errors
    ///
    /// See [`Store::write_lock`].
    pub fn lock(&mut self) -> StoreResult<()> {
        self.write_lock()
    }

    /// Acquires an exclusive lock held until [`Store::unlock`].
    ///
    /// Creates the base directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyLocked`] if this store holds a lock,
    /// [`StoreError::CreateDir`] if the base directory cannot be created, or
    /// [`StoreError::Lock`] if the lock cannot be acquired.
    pub fn write_lock(&mut self) -> StoreResult<()> {
        self.acquire(LockMode::Exclusive)
    }

    /// Acquires a shared lock held until [`Store::unlock`].
    ///
    /// # Errors
    ///
    /// Same as [`Store::write_lock`].
    pub fn read_only_lock(&mut self) -> StoreResult<()> {
        self.acquire(LockMode::Shared)
    }

    /// Releases the held lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Lock`] with [`hearth_fs::LockError::NilLock`] if
    /// no lock is held, or with the release failure. The store is unlocked
    /// afterwards in both cases.
    pub fn unlock(&mut self) -> StoreResult<()> {
        match std::mem::replace(&mut self.state, LockState::Unlocked) {
            LockState::Unlocked => Err(hearth_fs::LockError::NilLock.into()),
            LockState::Locked { handle, .. } => hearth_fs::unlock(handle).map_err(StoreError::from),
        }
    }

    fn acquire(&mut self, mode: LockMode) -> StoreResult<()> {
        if let LockState::Locked { mode: held, .. } = &self.state {
            return Err(StoreError::AlreadyLocked(*held));
        }

        self.fs
            .create_dir_all(&self.base, DIR_PERMISSIONS_PRIVATE)
            .map_err(|source| StoreError::CreateDir {
                path: self.base.clone(),
                source,
            })?;

        let handle = match mode {
            LockMode::Shared => hearth_fs::read_only_lock(&self.base)?,
            LockMode::Exclusive => hearth_fs::lock(&self.base)?,
        };
        self.state = LockState::Locked { mode, handle };
        Ok(())
    }

    /// Runs `op` under a lock of `mode`, unless a lock is already held.
    fn with_lock<T>(
        &mut self,
        mode: LockMode,
        op: impl FnOnce(&mut Self) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if let LockState::Locked { mode: held, .. } = &self.state {
            if *held == LockMode::Shared && mode == LockMode::Exclusive {
                warn!(path = %self.base.display(), "modifying store under a shared lock");
            }
            return op(self);
        }

        self.acquire(mode)?;
        let result = op(self);
        let released = self.unlock();
        finish(result, released)
    }

    fn read_key(&mut self, key: &str) -> StoreResult<Vec<u8>> {
        self.with_lock(LockMode::Shared, |store| {
            if let Some(cached) = store.cache.get(key) {
                return Ok(cached.to_vec());
            }
            let data = fs::read(record_path(&store.base, key))
                .map_err(|e| StoreError::io(StoreOp::Read, key, e))?;
            store.cache.insert(key, &data);
            Ok(data)
        })
    }

    /// Removes empty key directories between `record` and the base.
    fn prune_empty_dirs(&self, record: &Path) {
        let mut dir = record.parent();
        while let Some(current) = dir {
            if current == self.base || !current.starts_with(&self.base) {
                break;
            }
            if fs::remove_dir(current).is_err() {
                // Not empty, or gone already.
                break;
            }
            dir = current.parent();
        }
    }
}

/// Combines an operation result with the release of the lock it ran under.
fn finish<T>(result: StoreResult<T>, released: StoreResult<()>) -> StoreResult<T> {
    match (result, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(e), Ok(())) | (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(cleanup)) => Err(StoreError::joined(e, cleanup)),
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if let LockState::Locked { .. } = self.state {
            if let Err(e) = self.unlock() {
                warn!(path = %self.base.display(), error = %e, "failed releasing store lock on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_fs::{LockError, Umask};
    use std::io;
    use tempfile::{tempdir, TempDir};

    fn open(cache_size: u64) -> (TempDir, Store) {
        let dir = tempdir().unwrap();
        let options = StoreOptions::new()
            .path(dir.path().join("store"))
            .cache_size(cache_size);
        let store = Store::new(options, Filesystem::with_umask(Umask::DEFAULT));
        (dir, store)
    }

    #[test]
    fn write_then_read() {
        let (_dir, mut store) = open(0);

        store.write("report-2024", b"hello").unwrap();
        assert_eq!(store.read("report-2024").unwrap(), b"hello");
        assert!(!store.is_locked());
    }

    #[test]
    fn record_lands_at_sharded_path() {
        let (_dir, mut store) = open(0);
        store.write("report-2024", b"hello").unwrap();

        let key = Store::digest("report-2024");
        let expected = store.path().join(&key).join(&key);
        assert_eq!(fs::read(expected).unwrap(), b"hello");
    }

    #[test]
    fn has_tracks_write_and_delete() {
        let (_dir, mut store) = open(1024);

        assert!(!store.has("name").unwrap());
        store.write("name", b"v").unwrap();
        assert!(store.has("name").unwrap());
        store.delete("name").unwrap();
        assert!(!store.has("name").unwrap());
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, mut store) = open(0);

        let err = store.read("missing").unwrap_err();
        assert!(matches!(err, StoreError::Io { op: StoreOp::Read, .. }));
        assert!(err.is_not_found());
        assert!(!store.is_locked());
    }

    #[test]
    fn delete_missing_fails() {
        let (_dir, mut store) = open(0);

        let err = store.delete("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_prunes_empty_key_directories() {
        let (_dir, mut store) = open(0);
        store.write("gone", b"x").unwrap();
        let key_dir = store.path().join(Store::digest("gone"));
        assert!(key_dir.is_dir());

        store.delete("gone").unwrap();
        assert!(!key_dir.exists());
        assert!(store.path().is_dir());
    }

    #[test]
    fn cache_serves_reads_and_is_invalidated_by_writes() {
        let (_dir, mut store) = open(1024);
        store.write("cached", b"one").unwrap();

        assert_eq!(store.read("cached").unwrap(), b"one");
        assert_eq!(store.cached_bytes(), 3);

        store.write("cached", b"two!").unwrap();
        assert_eq!(store.cached_bytes(), 0);
        assert_eq!(store.read("cached").unwrap(), b"two!");
    }

    #[test]
    fn cache_disabled_with_zero_budget() {
        let (_dir, mut store) = open(0);
        store.write("a", b"abc").unwrap();
        store.read("a").unwrap();
        assert_eq!(store.cached_bytes(), 0);
    }

    #[test]
    fn zero_budget_store_sees_removed_empty_record() {
        let (_dir, mut store) = open(0);
        store.write("empty", b"").unwrap();
        assert!(store.read("empty").unwrap().is_empty());

        let key = Store::digest("empty");
        fs::remove_file(store.path().join(&key).join(&key)).unwrap();

        assert!(!store.has("empty").unwrap());
        assert!(store.read("empty").unwrap_err().is_not_found());
    }

    #[test]
    fn finish_keeps_value_when_release_succeeds() {
        assert_eq!(finish(Ok(7), Ok(())).unwrap(), 7);
    }

    #[test]
    fn finish_reports_release_failure_after_success() {
        let err = finish(Ok(7), Err(LockError::NilLock.into())).unwrap_err();
        assert!(matches!(err, StoreError::Lock(LockError::NilLock)));
    }

    #[test]
    fn finish_reports_operation_failure() {
        let op_err = StoreError::io(StoreOp::Read, "k", io::Error::from(io::ErrorKind::NotFound));
        let err = finish::<()>(Err(op_err), Ok(())).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn finish_joins_operation_and_release_failures() {
        let op_err = StoreError::io(
            StoreOp::Delete,
            "k",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let release_err = StoreError::Lock(LockError::Release {
            path: PathBuf::from("/base"),
            errors: vec![io::Error::from(io::ErrorKind::Other)].into(),
        });

        let err = finish::<()>(Err(op_err), Err(release_err)).unwrap_err();
        assert!(err.is_lock());
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        let StoreError::Joined(errors) = err else {
            panic!("expected joined error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn explicit_lock_is_kept_across_operations() {
        let (_dir, mut store) = open(0);

        store.lock().unwrap();
        assert_eq!(store.lock_mode(), Some(LockMode::Exclusive));

        store.write("a", b"1").unwrap();
        assert!(store.has("a").unwrap());
        assert_eq!(store.read("a").unwrap(), b"1");
        assert!(store.is_locked());

        store.unlock().unwrap();
        assert!(!store.is_locked());
    }

    #[test]
    fn failed_operation_keeps_explicit_lock() {
        let (_dir, mut store) = open(0);

        store.read_only_lock().unwrap();
        assert!(store.read("missing").is_err());
        assert_eq!(store.lock_mode(), Some(LockMode::Shared));
        store.unlock().unwrap();
    }

    #[test]
    fn double_lock_is_rejected() {
        let (_dir, mut store) = open(0);

        store.read_only_lock().unwrap();
        let err = store.write_lock().unwrap_err();
        assert!(matches!(err, StoreError::AlreadyLocked(LockMode::Shared)));
        assert!(err.is_lock());
        store.unlock().unwrap();
    }

    #[test]
    fn unlock_without_lock_is_nil_lock() {
        let (_dir, mut store) = open(0);

        let err = store.unlock().unwrap_err();
        assert!(matches!(err, StoreError::Lock(LockError::NilLock)));
    }

    #[test]
    fn rename_moves_content() {
        let (_dir, mut store) = open(0);
        store.write("old", b"payload").unwrap();

        store.rename("old", "new").unwrap();
        assert!(!store.has("old").unwrap());
        assert_eq!(store.read("new").unwrap(), b"payload");
    }

    #[test]
    fn rename_to_same_name_keeps_record() {
        let (_dir, mut store) = open(0);
        store.write("same", b"payload").unwrap();

        store.rename("same", "same").unwrap();
        assert_eq!(store.read("same").unwrap(), b"payload");
    }

    #[test]
    fn rename_missing_source_fails_without_creating_target() {
        let (_dir, mut store) = open(0);

        let err = store.rename("absent", "target").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.has("target").unwrap());
    }

    #[test]
    fn keys_lists_digests() {
        let (_dir, mut store) = open(0);
        store.write("a", b"1").unwrap();
        store.write("b", b"2").unwrap();

        let mut keys: Vec<String> = store.keys().map(Result::unwrap).collect();
        keys.sort();

        let mut expected = vec![Store::digest("a"), Store::digest("b")];
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn keys_on_missing_base_is_empty() {
        let (_dir, store) = open(0);
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn read_from_key_uses_raw_key() {
        let (_dir, mut store) = open(0);
        store.write("raw", b"bytes").unwrap();

        let key = store.keys().next().unwrap().unwrap();
        assert_eq!(store.read_from_key(&key).unwrap(), b"bytes");
    }

    #[test]
    fn read_from_key_rejects_traversal() {
        let (_dir, mut store) = open(0);

        let err = store.read_from_key("../escape").unwrap_err();
        assert!(matches!(err, StoreError::Fs(_)));
        assert_eq!(err.io_kind(), None);
    }

    #[test]
    fn lock_creates_base_directory() {
        let (_dir, mut store) = open(0);
        assert!(!store.path().exists());

        store.read_only_lock().unwrap();
        assert!(store.path().is_dir());
        store.unlock().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn records_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, mut store) = open(0);
        store.write("secret", b"x").unwrap();

        let key = Store::digest("secret");
        let file_mode = fs::metadata(store.path().join(&key).join(&key))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(file_mode & 0o077, 0);

        let dir_mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o077, 0);
    }

    #[test]
    fn dropping_locked_store_releases_lock() {
        let dir = tempdir().unwrap();
        let options = StoreOptions::new().path(dir.path());

        {
            let mut store = Store::new(options.clone(), Filesystem::default());
            store.lock().unwrap();
        }

        let handle = hearth_fs::lock(dir.path()).unwrap();
        hearth_fs::unlock(handle).unwrap();
    }
}
