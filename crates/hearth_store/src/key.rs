//! Name hashing and key sharding.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Characters per directory level.
pub const TRANSFORM_BLOCK_SIZE: usize = 64;

/// Returns the storage key of `name`: its SHA-256 digest in lowercase hex.
#[must_use]
pub fn digest(name: &str) -> String {
    hex::encode(Sha256::digest(name.as_bytes()))
}

/// Splits `key` into the directory components that lead to its file.
///
/// Each component is a consecutive block of [`TRANSFORM_BLOCK_SIZE`]
/// characters. A trailing partial block is dropped, so a key shorter than
/// one block maps to no directory at all.
#[must_use]
pub fn transform(key: &str) -> Vec<&str> {
    let mut blocks = Vec::with_capacity(key.len() / TRANSFORM_BLOCK_SIZE);
    let mut start = 0;
    let mut count = 0;

    for (idx, c) in key.char_indices() {
        count += 1;
        if count == TRANSFORM_BLOCK_SIZE {
            let end = idx + c.len_utf8();
            blocks.push(&key[start..end]);
            start = end;
            count = 0;
        }
    }

    blocks
}

/// Full path of the file holding `key` under `base`.
pub(crate) fn record_path(base: &Path, key: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    path.extend(transform(key));
    path.push(key);
    path
}
