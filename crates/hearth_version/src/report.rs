//! Build report.

use serde::Serialize;
use std::fmt;

/// Placeholder for build information that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// What was built, from which sources, for which target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Application version.
    pub version: String,
    /// Abbreviated git revision of the sources.
    pub revision: String,
    /// Whether the working tree had uncommitted changes.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dirty: bool,
    /// Target operating system.
    pub os: String,
    /// Target architecture.
    pub arch: String,
    /// Compiler version.
    pub rustc_version: String,
}

impl Report {
    /// Returns the report for this build.
    ///
    /// The version is `HEARTH_VERSION` at build time if set, the package
    /// version otherwise.
    #[must_use]
    pub fn current() -> Self {
        let version = option_env!("HEARTH_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        Self::with_version(version)
    }

    /// Returns the report for this build with an explicit version.
    #[must_use]
    pub fn with_version(version: &str) -> Self {
        Self {
            version: non_empty(version),
            revision: non_empty(env!("HEARTH_BUILD_REVISION")),
            dirty: env!("HEARTH_BUILD_DIRTY") == "true",
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            rustc_version: non_empty(env!("HEARTH_BUILD_RUSTC")),
        }
    }

    /// Parses [`Report::version`] as a semantic version.
    ///
    /// # Errors
    ///
    /// See [`crate::parse_version`].
    pub fn semver(&self) -> crate::VersionResult<crate::Version> {
        crate::parse_version(&self.version)
    }
}

fn non_empty(value: &str) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dirty = if self.dirty { "-dirty" } else { "" };
        writeln!(f, "Version:  {}", self.version)?;
        writeln!(f, "Revision: {}{dirty}", self.revision)?;
        writeln!(f, "Target:   {}/{}", self.os, self.arch)?;
        write!(f, "Compiler: {}", self.rustc_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_report_describes_this_build() {
        let report = Report::current();
        assert!(!report.version.is_empty());
        assert_eq!(report.os, std::env::consts::OS);
        assert_eq!(report.arch, std::env::consts::ARCH);
        assert!(!report.revision.is_empty());
    }

    #[test]
    fn empty_version_becomes_unknown() {
        assert_eq!(Report::with_version("  ").version, UNKNOWN);
    }

    #[test]
    fn json_uses_camel_case_and_omits_clean_flag() {
        let mut report = Report::with_version("1.2.3");
        report.dirty = false;
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["version"], "1.2.3");
        assert!(json.get("rustcVersion").is_some());
        assert!(json.get("dirty").is_none());

        report.dirty = true;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dirty"], true);
    }

    #[test]
    fn package_version_is_semver() {
        let report = Report::with_version(env!("CARGO_PKG_VERSION"));
        assert!(report.semver().is_ok());
    }

    #[test]
    fn display_flags_dirty_trees() {
        let mut report = Report::with_version("1.0.0");
        report.revision = "abc1234".into();
        report.dirty = true;
        assert!(report.to_string().contains("Revision: abc1234-dirty"));
    }
}
