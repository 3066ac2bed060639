//! # Hearth Version
//!
//! Version handling for Hearth applications.
//!
//! - [`parse_version`] / [`parse_constraint`] - Semantic versions and
//!   requirements, failing with [`VersionError`]
//! - [`Report`] - Build information captured at compile time
//! - [`new_id`] - Time-ordered UUID v7 identifiers
//!
//! ## Example
//!
//! ```rust
//! use hearth_version::{parse_constraint, parse_version};
//!
//! let version = parse_version("v1.4.2").unwrap();
//! let constraint = parse_constraint(">=1.2, <2").unwrap();
//! assert!(constraint.matches(&version));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod id;
mod parse;
mod report;

pub use error::{VersionError, VersionResult};
pub use id::new_id;
pub use parse::{parse_constraint, parse_version, Constraint, Version};
pub use report::{Report, UNKNOWN};
