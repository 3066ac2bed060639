//! # Hearth Filesystem
//!
//! Filesystem primitives shared by the Hearth crates.
//!
//! This crate provides the lowest-level building blocks for persisting data
//! on disk. It knows nothing about records, keys or stores.
//!
//! ## Components
//!
//! - [`write_file`] - Atomic replacement of a file's content (temp file + rename)
//! - [`lock`] / [`read_only_lock`] / [`unlock`] - Blocking advisory file locks
//! - [`Umask`] and [`Filesystem`] - Explicit process umask handling
//! - [`validate_path_component`] - Portable file name checks
//! - [`directory_size`] - Recursive size of a directory tree
//!
//! ## Initialization
//!
//! [`Filesystem::init`] captures the process umask and should be the first
//! thing an application does, before any component creates files.
//!
//! ## Example
//!
//! ```rust
//! use hearth_fs::{Filesystem, Umask, FILE_PERMISSIONS_PRIVATE};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let fs = Filesystem::with_umask(Umask::DEFAULT);
//! let path = dir.path().join("settings.json");
//!
//! fs.write_file(&path, b"{}", FILE_PERMISSIONS_PRIVATE).unwrap();
//! assert_eq!(std::fs::read(&path).unwrap(), b"{}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod atomic;
mod context;
mod error;
mod lock;
mod path;
mod perms;
mod size;
mod umask;

pub use atomic::{write_file, write_from_reader, TEMP_FILE_PREFIX};
pub use context::Filesystem;
pub use error::{ErrorList, FsError, FsResult, LockError, LockResult, PathRejection};
pub use lock::{lock, read_only_lock, unlock, LockHandle, LockMode, Platform, PlatformLock};
pub use path::{validate_path_component, PATH_COMPONENT_MAX_LENGTH};
pub use perms::{
    DEFAULT_UMASK, DIR_PERMISSIONS_DEFAULT, DIR_PERMISSIONS_PRIVATE, FILE_PERMISSIONS_DEFAULT,
    FILE_PERMISSIONS_PRIVATE,
};
pub use size::directory_size;
pub use umask::Umask;
