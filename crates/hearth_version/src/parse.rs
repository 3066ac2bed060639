//! Semantic version parsing.

use crate::error::{VersionError, VersionResult};

/// A semantic version.
pub type Version = semver::Version;

/// A set of version requirements, such as `>=1.2, <2`.
pub type Constraint = semver::VersionReq;

/// Parses a semantic version.
///
/// A single leading `v` is accepted (`v1.2.3`). Everything else follows
/// SemVer 2.0 strictly: three numeric segments, no leading zeros, optional
/// pre-release and build metadata.
///
/// # Errors
///
/// Returns [`VersionError::InvalidVersion`] if `input` is not a version.
pub fn parse_version(input: &str) -> VersionResult<Version> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|source| VersionError::InvalidVersion {
        input: input.to_string(),
        source,
    })
}

/// Parses a version constraint.
///
/// # Errors
///
/// Returns [`VersionError::InvalidConstraint`] if `input` is not a valid
/// requirement.
pub fn parse_constraint(input: &str) -> VersionResult<Constraint> {
    Constraint::parse(input.trim()).map_err(|source| VersionError::InvalidConstraint {
        input: input.to_string(),
        source,
    })
}
