//! Error types for filesystem operations.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// Writing the temporary file or renaming it over the target failed.
    ///
    /// The target file keeps its previous content.
    #[error("failed to write {} atomically: {source}", path.display())]
    AtomicWrite {
        /// The target path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A path component violates platform file name rules.
    #[error("invalid path component {component:?}: {reason}")]
    InvalidPath {
        /// The rejected component.
        component: String,
        /// Why it was rejected.
        reason: PathRejection,
    },

    /// A umask with bits outside `0o777`.
    #[error("umask {0:#o} is out of range")]
    InvalidUmask(u32),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// Returns the kind of the underlying I/O error, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::AtomicWrite { source, .. } => Some(source.kind()),
            Self::Io(source) => Some(source.kind()),
            Self::InvalidPath { .. } | Self::InvalidUmask(_) => None,
        }
    }
}

/// Reasons a path component is rejected by [`crate::validate_path_component`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathRejection {
    /// Empty or whitespace only.
    #[error("path component cannot be empty")]
    Empty,

    /// Longer than [`crate::PATH_COMPONENT_MAX_LENGTH`] bytes.
    #[error("path component must be strictly shorter than 256 characters (got {len})")]
    TooLong {
        /// Length in bytes.
        len: usize,
    },

    /// Contains a character the platform reserves.
    #[error("forbidden character {0:?} in path component")]
    ForbiddenCharacter(char),

    /// A name the platform reserves (`.`, `..`, device names on Windows).
    #[error("forbidden keyword in path component")]
    ForbiddenKeyword,

    /// Ends with a dot or a space (Windows).
    #[error("path component cannot end with a space or dot")]
    TrailingDotOrSpace,
}

/// Errors that can occur while acquiring or releasing an advisory lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock target could not be opened or locked.
    #[error("failed to acquire lock on {}: {source}", path.display())]
    Acquire {
        /// The locked path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Unlocking or closing the handle failed; both failures are kept.
    #[error("failed to release lock on {}: {errors}", path.display())]
    Release {
        /// The locked path.
        path: PathBuf,
        /// The unlock error and/or the close error, in that order.
        #[source]
        errors: ErrorList<io::Error>,
    },

    /// Release requested while no lock is held.
    #[error("nil lock")]
    NilLock,
}

impl LockError {
    /// Returns the kind of the first underlying I/O error, if any.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Acquire { source, .. } => Some(source.kind()),
            Self::Release { errors, .. } => errors.first().map(io::Error::kind),
            Self::NilLock => None,
        }
    }
}

/// An ordered accumulation of errors.
///
/// Used on cleanup paths, where a secondary failure (closing a handle after a
/// failed unlock, releasing a lock after a failed read) must be reported along
/// with the primary one.
#[derive(Debug)]
pub struct ErrorList<E> {
    errors: Vec<E>,
}

impl<E> ErrorList<E> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Appends an error.
    pub fn push(&mut self, error: E) {
        self.errors.push(error);
    }

    /// Appends the error of `result`, if any.
    pub fn record<T>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Returns true if no error has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the first recorded error.
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        self.errors.first()
    }

    /// Iterates over the recorded errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.errors.iter()
    }

    /// Consumes the list, returning the errors.
    #[must_use]
    pub fn into_inner(self) -> Vec<E> {
        self.errors
    }
}

impl<E> Default for ErrorList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> From<Vec<E>> for ErrorList<E> {
    fn from(errors: Vec<E>) -> Self {
        Self { errors }
    }
}

impl<E> IntoIterator for ErrorList<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<E: Error + 'static> Error for ErrorList<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.errors.first().map(|e| e as &(dyn Error + 'static))
    }
}
