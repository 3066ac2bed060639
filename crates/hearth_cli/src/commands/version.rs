//! Version command.

use crate::OutputFormat;
use hearth_version::{parse_constraint, Report};
use std::error::Error;
use std::fmt;

/// The running version does not meet a `--check` constraint.
#[derive(Debug)]
pub struct Unsatisfied {
    version: String,
    constraint: String,
}

impl fmt::Display for Unsatisfied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version {} does not satisfy '{}'",
            self.version, self.constraint
        )
    }
}

impl Error for Unsatisfied {}

/// Prints the build report.
pub fn run(format: OutputFormat, check: Option<&str>) -> Result<(), Box<dyn Error>> {
    let report = Report::current();
    if let Some(constraint) = check {
        verify(&report, constraint)?;
    }

    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Fails unless `report`'s version satisfies `constraint`.
pub fn verify(report: &Report, constraint: &str) -> Result<(), Box<dyn Error>> {
    let required = parse_constraint(constraint)?;
    let version = report.semver()?;
    if required.matches(&version) {
        Ok(())
    } else {
        Err(Box::new(Unsatisfied {
            version: report.version.clone(),
            constraint: constraint.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_version::VersionError;

    #[test]
    fn matching_constraint_passes() {
        let report = Report::with_version("1.4.0");
        verify(&report, ">=1.2, <2").unwrap();
    }

    #[test]
    fn unmet_constraint_is_reported() {
        let report = Report::with_version("2.1.0");
        let err = verify(&report, "^1").unwrap_err();
        assert!(err.is::<Unsatisfied>());
        assert_eq!(err.to_string(), "version 2.1.0 does not satisfy '^1'");
    }

    #[test]
    fn invalid_constraint_is_a_version_error() {
        let report = Report::with_version("1.0.0");
        let err = verify(&report, "not a range").unwrap_err();
        let err = err.downcast::<VersionError>().unwrap();
        assert!(err.is_invalid_version());
    }

    #[test]
    fn unparseable_build_version_is_rejected() {
        let report = Report::with_version("dev-build");
        let err = verify(&report, "*").unwrap_err();
        assert!(err.downcast_ref::<VersionError>().is_some());
    }
}
