//! # Hearth Testkit
//!
//! Test utilities for Hearth.
//!
//! This crate provides:
//! - Store fixtures backed by a temporary directory
//! - Property-based test generators using proptest
//! - Readers that misbehave on purpose
//! - A concurrent writer harness
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hearth_testkit::prelude::*;
//!
//! #[test]
//! fn round_trip() {
//!     with_temp_store(|store| {
//!         store.write("name", b"value").unwrap();
//!         assert_eq!(store.read("name").unwrap(), b"value");
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod io;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::io::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use io::*;
pub use stress::*;
