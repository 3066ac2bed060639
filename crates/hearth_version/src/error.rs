//! Error types for version parsing.

use thiserror::Error;

/// Result type for version parsing.
pub type VersionResult<T> = Result<T, VersionError>;

/// Errors that can occur while parsing versions.
///
/// Both variants are invalid-version errors; [`VersionError::is_invalid_version`]
/// tests for the class without matching on the variant.
#[derive(Debug, Error)]
pub enum VersionError {
    /// A version string is not a valid semantic version.
    #[error("invalid version '{input}': {source}")]
    InvalidVersion {
        /// The rejected input.
        input: String,
        /// The parser error.
        #[source]
        source: semver::Error,
    },

    /// A constraint string is not a valid version requirement.
    #[error("invalid version constraint '{input}': {source}")]
    InvalidConstraint {
        /// The rejected input.
        input: String,
        /// The parser error.
        #[source]
        source: semver::Error,
    },
}

impl VersionError {
    /// Returns true for every version parsing failure.
    #[must_use]
    pub const fn is_invalid_version(&self) -> bool {
        matches!(
            self,
            Self::InvalidVersion { .. } | Self::InvalidConstraint { .. }
        )
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidVersion { input, .. } | Self::InvalidConstraint { input, .. } => input,
        }
    }
}
