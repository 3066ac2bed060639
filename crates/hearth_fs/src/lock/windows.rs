//! `LockFileEx` based locking.

use super::{LockMode, PlatformLock};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Locks a `<path>.lock` sibling with `LockFileEx`.
///
/// Directory handles cannot be byte-range locked, so the lock lives in a
/// companion file created on first use. `path` itself must still exist.
#[derive(Debug, Clone, Copy)]
pub struct LockFileEx;

fn lock_file_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

impl PlatformLock for LockFileEx {
    fn open_target(path: &Path) -> io::Result<File> {
        fs::metadata(path)?;
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_file_path(path))
    }

    fn raw_lock(file: &File, mode: LockMode) -> io::Result<()> {
        match mode {
            LockMode::Shared => FileExt::lock_shared(file),
            LockMode::Exclusive => FileExt::lock_exclusive(file),
        }
    }

    fn raw_unlock(file: &File) -> io::Result<()> {
        FileExt::unlock(file)
    }

    fn close(file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }
}
