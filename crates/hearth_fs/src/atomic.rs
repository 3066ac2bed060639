//! Atomic file replacement.
//!
//! Content is written to a temporary file in the target's directory, synced,
//! then renamed over the target. Readers see either the old or the new
//! content, never a mix. The temporary file lives in the same directory so
//! the rename never crosses a filesystem boundary.

use crate::error::{FsError, FsResult};
use crate::umask::Umask;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Prefix of the temporary files created next to a write target.
pub const TEMP_FILE_PREFIX: &str = ".tmp-";

/// Atomically replaces the content of `path` with `data`.
///
/// The file is created with `permissions` minus the bits set in `umask`.
///
/// # Errors
///
/// Returns [`FsError::AtomicWrite`] if any step fails. The previous content
/// of `path`, if any, is left untouched and the temporary file is removed.
pub fn write_file(path: &Path, data: &[u8], permissions: u32, umask: Umask) -> FsResult<()> {
    write_from_reader(path, data, data.len() as u64, permissions, umask)
}

/// Atomically replaces the content of `path` with everything read from `reader`.
///
/// `expected_len` is the number of bytes the reader is supposed to yield. If
/// it yields fewer, the write fails with [`io::ErrorKind::WriteZero`] and the
/// target is not replaced.
///
/// # Errors
///
/// Returns [`FsError::AtomicWrite`] on short writes and on any I/O failure.
pub fn write_from_reader<R: Read>(
    path: &Path,
    mut reader: R,
    expected_len: u64,
    permissions: u32,
    umask: Umask,
) -> FsResult<()> {
    let fail = |source: io::Error| FsError::AtomicWrite {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path.file_name().ok_or_else(|| {
        fail(io::Error::new(
            io::ErrorKind::InvalidInput,
            "target path has no file name",
        ))
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut prefix = OsString::from(TEMP_FILE_PREFIX);
    prefix.push(file_name);

    // Dropping the temp file on any early return deletes it.
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile_in(dir)
        .map_err(fail)?;

    set_mode(temp.path(), umask.apply(permissions)).map_err(fail)?;

    let written = io::copy(&mut reader, temp.as_file_mut()).map_err(fail)?;
    if written < expected_len {
        return Err(fail(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {written} of {expected_len} bytes"),
        )));
    }

    temp.as_file().sync_all().map_err(fail)?;

    // Close before the rename.
    let temp_path = temp.into_temp_path();
    temp_path.persist(path).map_err(|e| fail(e.error))?;

    sync_directory(dir).map_err(fail)?;

    debug!(path = %path.display(), bytes = written, "atomic write completed");
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions)
}

/// Fsyncs a directory so a rename inside it is durable.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> io::Result<()> {
    // NTFS journals metadata updates
    Ok(())
}
