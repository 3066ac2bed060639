//! `flock(2)` based locking.

use super::{LockMode, PlatformLock};
use fs2::FileExt;
use std::fs::File;
use std::io;
use std::os::unix::io::IntoRawFd;
use std::path::Path;

/// Locks the path itself with `flock(2)`.
///
/// Directories can be opened read-only and locked, so a store locks its base
/// directory directly.
#[derive(Debug, Clone, Copy)]
pub struct Flock;

impl PlatformLock for Flock {
    fn open_target(path: &Path) -> io::Result<File> {
        File::open(path)
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
        nix::unistd::close(file.into_raw_fd()).map_err(io::Error::from)
    }
}
