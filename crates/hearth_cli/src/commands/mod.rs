//! CLI command implementations.

pub mod du;
pub mod keys;
pub mod record;
pub mod version;
