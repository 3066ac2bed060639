//! Error types for store operations.

use hearth_fs::{ErrorList, FsError, LockError, LockMode};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The record operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Reading a record.
    Read,
    /// Removing a record.
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Delete => "delete",
        })
    }
}

/// Errors that can occur during store operations.
///
/// Every variant wraps the lower-level cause. Use [`StoreError::is_lock`],
/// [`StoreError::io_kind`] or [`StoreError::is_not_found`] to tell causes apart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Acquiring or releasing the store lock failed.
    #[error("store lock failed: {0}")]
    Lock(#[from] LockError),

    /// An explicit lock was requested while one is already held.
    #[error("store is already locked ({0:?})")]
    AlreadyLocked(LockMode),

    /// The base directory or a key directory could not be created.
    #[error("failed to create store directory {}: {source}", path.display())]
    CreateDir {
        /// The directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading or removing a record failed.
    #[error("store {op} failed for key {key}: {source}")]
    Io {
        /// The operation.
        op: StoreOp,
        /// The storage key.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing a record or validating a raw key failed.
    #[error("store operation failed: {0}")]
    Fs(#[from] FsError),

    /// Walking the store directory failed.
    #[error("failed to enumerate store keys under {}: {source}", path.display())]
    Walk {
        /// The entry being visited.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An operation failed and releasing the lock afterwards failed too.
    #[error(transparent)]
    Joined(ErrorList<StoreError>),
}

impl StoreError {
    /// Creates a record I/O error.
    pub fn io(op: StoreOp, key: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            op,
            key: key.into(),
            source,
        }
    }

    /// Joins an operation error with a cleanup error.
    #[must_use]
    pub fn joined(primary: Self, cleanup: Self) -> Self {
        let mut errors = match primary {
            Self::Joined(errors) => errors,
            other => ErrorList::from(vec![other]),
        };
        errors.push(cleanup);
        Self::Joined(errors)
    }

    /// Returns true if a locking problem is part of this error.
    #[must_use]
    pub fn is_lock(&self) -> bool {
        match self {
            Self::Lock(_) | Self::AlreadyLocked(_) => true,
            Self::Joined(errors) => errors.iter().any(Self::is_lock),
            _ => false,
        }
    }

    /// Returns the kind of the first underlying I/O error, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Lock(e) => e.io_kind(),
            Self::AlreadyLocked(_) => None,
            Self::CreateDir { source, .. } | Self::Io { source, .. } | Self::Walk { source, .. } => {
                Some(source.kind())
            }
            Self::Fs(e) => e.io_kind(),
            Self::Joined(errors) => errors.iter().find_map(Self::io_kind),
        }
    }

    /// Returns true if the underlying cause is a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_visible_through_wrapping() {
        let err = StoreError::io(
            StoreOp::Read,
            "abc",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert!(!err.is_lock());
        assert!(err.to_string().starts_with("store read failed for key abc"));
    }

    #[test]
    fn joined_keeps_both_causes() {
        let primary = StoreError::io(
            StoreOp::Delete,
            "abc",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let cleanup = StoreError::Lock(LockError::NilLock);

        let err = StoreError::joined(primary, cleanup);
        assert!(err.is_lock());
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));

        let StoreError::Joined(errors) = err else {
            panic!("expected joined error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn joined_flattens_nested_lists() {
        let first = StoreError::AlreadyLocked(LockMode::Shared);
        let second = StoreError::Lock(LockError::NilLock);
        let third = StoreError::Lock(LockError::NilLock);

        let err = StoreError::joined(StoreError::joined(first, second), third);
        let StoreError::Joined(errors) = err else {
            panic!("expected joined error");
        };
        assert_eq!(errors.len(), 3);
    }
}
