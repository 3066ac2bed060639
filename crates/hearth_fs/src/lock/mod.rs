//! Advisory file locks.
//!
//! Locks are blocking and advisory: they only coordinate callers that go
//! through this module (in this process or any other). No timeout is
//! applied; an acquisition returns once the lock is granted or the platform
//! call fails with anything other than an interruption.
//!
//! The platform specifics sit behind [`PlatformLock`], with one
//! implementation per OS family selected at build time.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

use crate::error::{ErrorList, LockError, LockResult};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The lock implementation for the build target.
#[cfg(unix)]
pub type Platform = unix::Flock;

/// The lock implementation for the build target.
#[cfg(windows)]
pub type Platform = windows::LockFileEx;

/// Whether a lock excludes every other holder or only exclusive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Read lock; any number may coexist.
    Shared,
    /// Write lock; coexists with nothing.
    Exclusive,
}

/// A held advisory lock.
///
/// Created by [`lock`] or [`read_only_lock`] and consumed by [`unlock`].
/// Dropping a handle without unlocking it closes the underlying file, which
/// also releases the lock, but any error is lost.
#[derive(Debug)]
pub struct LockHandle {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockHandle {
    /// Returns the locked path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mode the lock was acquired in.
    #[must_use]
    pub const fn mode(&self) -> LockMode {
        self.mode
    }
}

/// Platform capability for advisory locking.
///
/// Implementors provide the raw single-attempt calls; interruption retries,
/// error wrapping and close-on-failure are shared.
pub trait PlatformLock {
    /// Opens the file that carries the lock for `path`.
    fn open_target(path: &Path) -> io::Result<File>;

    /// Blocks until `file` is locked in `mode`.
    fn raw_lock(file: &File, mode: LockMode) -> io::Result<()>;

    /// Removes the lock from `file`.
    fn raw_unlock(file: &File) -> io::Result<()>;

    /// Closes `file`, reporting the close error where the platform has one.
    fn close(file: File) -> io::Result<()>;

    /// Acquires an exclusive lock on `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Acquire`] if the target cannot be opened (for
    /// instance because `path` does not exist) or locked.
    fn lock(path: &Path) -> LockResult<LockHandle> {
        acquire::<Self>(path, LockMode::Exclusive)
    }

    /// Acquires a shared lock on `path`.
    ///
    /// # Errors
    ///
    /// Same as [`PlatformLock::lock`].
    fn read_only_lock(path: &Path) -> LockResult<LockHandle> {
        acquire::<Self>(path, LockMode::Shared)
    }

    /// Releases `handle`.
    ///
    /// The handle is closed even if the unlock call fails.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Release`] holding the unlock error, the close
    /// error, or both.
    fn unlock(handle: LockHandle) -> LockResult<()> {
        release::<Self>(handle)
    }
}

/// Acquires an exclusive lock on `path`, blocking until it is granted.
///
/// No other shared or exclusive lock on `path` can be held until the returned
/// handle is passed to [`unlock`] or dropped. `path` must exist.
///
/// # Errors
///
/// Returns [`LockError::Acquire`] if the path is missing, not accessible, or
/// the platform lock call fails.
pub fn lock(path: &Path) -> LockResult<LockHandle> {
    Platform::lock(path)
}

/// Acquires a shared lock on `path`, blocking until it is granted.
///
/// Any number of shared locks may coexist; none coexist with an exclusive one.
///
/// # Errors
///
/// Same as [`lock`].
pub fn read_only_lock(path: &Path) -> LockResult<LockHandle> {
    Platform::read_only_lock(path)
}

/// Releases a lock acquired by [`lock`] or [`read_only_lock`].
///
/// # Errors
///
/// Returns [`LockError::Release`] if unlocking or closing fails.
pub fn unlock(handle: LockHandle) -> LockResult<()> {
    Platform::unlock(handle)
}

fn acquire<P: PlatformLock + ?Sized>(path: &Path, mode: LockMode) -> LockResult<LockHandle> {
    let file = P::open_target(path).map_err(|source| LockError::Acquire {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(source) = retry_interrupted(|| P::raw_lock(&file, mode)) {
        if let Err(close_err) = P::close(file) {
            warn!(path = %path.display(), error = %close_err, "failed closing lock file");
        }
        return Err(LockError::Acquire {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), ?mode, "lock acquired");
    Ok(LockHandle {
        file,
        path: path.to_path_buf(),
        mode,
    })
}

fn release<P: PlatformLock + ?Sized>(handle: LockHandle) -> LockResult<()> {
    let LockHandle { file, path, mode } = handle;
    let mut errors = ErrorList::new();

    errors.record(retry_interrupted(|| P::raw_unlock(&file)));
    errors.record(P::close(file));

    if errors.is_empty() {
        debug!(path = %path.display(), ?mode, "lock released");
        Ok(())
    } else {
        Err(LockError::Release { path, errors })
    }
}

fn retry_interrupted(mut op: impl FnMut() -> io::Result<()>) -> io::Result<()> {
    loop {
        match op() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
