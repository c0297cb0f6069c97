//! Per-package results of a pipeline phase.

use serde::Serialize;
use std::path::PathBuf;

/// Pipeline phase a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Decompile and analyze
    Analyze,
    /// Rebuild and relocate
    Rebuild,
}

/// What happened to one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageStatus {
    /// Collaborator (and relocation, for rebuilds) succeeded
    Succeeded,
    /// Collaborator failed
    Failed {
        /// Error message
        reason: String,
    },
    /// Rebuilt, but the artifact could not be moved into `dist`
    RelocationFailed {
        /// Error message
        reason: String,
    },
}

/// Result for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    /// Bare file name
    pub file_name: String,
    /// Final artifact location, for successful rebuilds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Outcome
    #[serde(flatten)]
    pub status: PackageStatus,
}

impl PackageOutcome {
    /// Successful outcome.
    pub fn succeeded(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            artifact: None,
            status: PackageStatus::Succeeded,
        }
    }

    /// Failed outcome.
    pub fn failed(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            artifact: None,
            status: PackageStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Whether the package went through without error.
    pub fn is_success(&self) -> bool {
        self.status == PackageStatus::Succeeded
    }
}

/// Which packages of a phase succeeded and which failed, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    /// Phase
    pub phase: Phase,
    /// Manifest the phase ran against
    pub manifest_path: PathBuf,
    /// Outcomes, base first
    pub packages: Vec<PackageOutcome>,
}

impl PhaseReport {
    /// Empty report for `phase`.
    pub fn new(phase: Phase, manifest_path: PathBuf) -> Self {
        Self {
            phase,
            manifest_path,
            packages: Vec::new(),
        }
    }

    /// File names of packages that succeeded.
    pub fn succeeded(&self) -> Vec<&str> {
        self.packages
            .iter()
            .filter(|p| p.is_success())
            .map(|p| p.file_name.as_str())
            .collect()
    }

    /// Packages that did not succeed.
    pub fn failures(&self) -> Vec<&PackageOutcome> {
        self.packages.iter().filter(|p| !p.is_success()).collect()
    }

    /// True when every package succeeded.
    pub fn is_success(&self) -> bool {
        self.packages.iter().all(PackageOutcome::is_success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_successes_from_failures() {
        let mut report = PhaseReport::new(Phase::Analyze, PathBuf::from("/out/configs.yml"));
        report.packages.push(PackageOutcome::succeeded("app.apk"));
        report
            .packages
            .push(PackageOutcome::failed("split_config.en.apk", "exit code 1"));

        assert!(!report.is_success());
        assert_eq!(report.succeeded(), vec!["app.apk"]);
        assert_eq!(report.failures()[0].file_name, "split_config.en.apk");
    }

    #[test]
    fn json_shape() {
        let mut report = PhaseReport::new(Phase::Rebuild, PathBuf::from("/out/configs.yml"));
        report
            .packages
            .push(PackageOutcome::failed("app.apk", "boom"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phase"], "rebuild");
        assert_eq!(json["packages"][0]["status"], "failed");
        assert_eq!(json["packages"][0]["reason"], "boom");
    }
}
