//! Enumeration of stored keys.

use crate::error::{StoreError, StoreResult};
use hearth_fs::TEMP_FILE_PREFIX;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazy, one-shot iterator over the storage keys present in a store.
///
/// Created by [`crate::Store::keys`]. The directory tree is walked as the
/// iterator advances; no lock is taken. Hold a lock on the store for the
/// whole iteration to get a consistent snapshot.
///
/// A missing base directory yields no keys. Temporary files left by
/// interrupted writes are skipped.
#[derive(Debug)]
pub struct Keys {
    walker: Option<walkdir::IntoIter>,
}

impl Keys {
    pub(crate) fn new(base: &Path) -> Self {
        Self {
            walker: Some(WalkDir::new(base).min_depth(1).into_iter()),
        }
    }
}

impl Iterator for Keys {
    type Item = StoreResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let walker = self.walker.as_mut()?;

        loop {
            let entry = match walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    let root_missing = err.depth() == 0
                        && err
                            .io_error()
                            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
                    if root_missing {
                        self.walker = None;
                        return None;
                    }
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
                    return Some(Err(StoreError::Walk {
                        path,
                        source: io::Error::from(err),
                    }));
                }
                None => {
                    self.walker = None;
                    return None;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if name.starts_with(TEMP_FILE_PREFIX) {
                continue;
            }
            return Some(Ok(name.to_string()));
        }
    }
}

impl std::iter::FusedIterator for Keys {}
