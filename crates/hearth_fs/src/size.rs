//! Directory size accounting.

use crate::error::{FsError, FsResult};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Returns the total size in bytes of every non-directory entry under `path`.
///
/// Symbolic links are not followed; a link counts for the size of the link
/// itself. If `path` is a file, its own size is returned.
///
/// # Errors
///
/// Returns [`FsError::Io`] if `path` does not exist or an entry cannot be read.
pub fn directory_size(path: &Path) -> FsResult<u64> {
    let mut size = 0u64;

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| FsError::Io(io::Error::from(e)))?;
        if entry.file_type().is_dir() {
            continue;
        }
        size += entry
            .metadata()
            .map_err(|e| FsError::Io(io::Error::from(e)))?
            .len();
    }

    Ok(size)
}
