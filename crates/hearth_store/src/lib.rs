//! # Hearth Store
//!
//! A disk-backed, content-addressable key-value store guarded by an advisory
//! lock on its base directory.
//!
//! Record names are hashed with SHA-256 into 64-character storage keys. Keys
//! are sharded into one directory level per 64-character block, and every
//! record is written atomically. A single lock on the base directory
//! serializes all access across processes: reads take it shared, writes take
//! it exclusive.
//!
//! ## Layout
//!
//! ```text
//! <base>/
//! └── 3f1a...c2/          # key[0..64]
//!     └── 3f1a...c2       # record bytes, named by the full key
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hearth_fs::Filesystem;
//! use hearth_store::{Store, StoreOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = Store::new(StoreOptions::new().path(dir.path()), Filesystem::default());
//!
//! store.write("report-2024", b"hello").unwrap();
//! assert_eq!(store.read("report-2024").unwrap(), b"hello");
//!
//! store.delete("report-2024").unwrap();
//! assert!(!store.has("report-2024").unwrap());
//! ```
//!
//! ## Batching
//!
//! Each operation locks and unlocks on its own. To run several operations
//! under one acquisition, take the lock explicitly:
//!
//! ```rust
//! # use hearth_fs::Filesystem;
//! # use hearth_store::{Store, StoreOptions};
//! # let dir = tempfile::tempdir().unwrap();
//! # let mut store = Store::new(StoreOptions::new().path(dir.path()), Filesystem::default());
//! store.lock().unwrap();
//! if !store.has("counter").unwrap() {
//!     store.write("counter", b"0").unwrap();
//! }
//! store.unlock().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod key;
mod keys;
mod store;

pub use config::{default_store_dir, StoreOptions, DEFAULT_CACHE_SIZE};
pub use error::{StoreError, StoreOp, StoreResult};
pub use key::{digest, transform, TRANSFORM_BLOCK_SIZE};
pub use keys::Keys;
pub use store::Store;

pub use hearth_fs::LockMode;
