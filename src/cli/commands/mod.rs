//! Command execution functions for the pipeline phases.

pub mod analyze;
pub mod install;
pub mod rebuild;

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::pipeline::{PackageStatus, PhaseReport};

/// Prints a phase report and maps it to an exit code.
///
/// Exit code 1 when any package failed, so scripts can tell a partial run
/// from a clean one.
pub(crate) fn print_report(report: &PhaseReport, runtime_config: &RuntimeConfig) -> Result<i32> {
    if runtime_config.json() {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for package in &report.packages {
            match &package.status {
                PackageStatus::Succeeded => match &package.artifact {
                    Some(artifact) => runtime_config
                        .success(&format!("{} → {}", package.file_name, artifact.display()))?,
                    None => runtime_config.success(&package.file_name)?,
                },
                PackageStatus::Failed { reason } | PackageStatus::RelocationFailed { reason } => {
                    runtime_config.warn(&format!("{}: {}", package.file_name, reason))?
                }
            }
        }
        runtime_config.indent(&format!("manifest: {}", report.manifest_path.display()))?;
    }

    if report.is_success() {
        Ok(0)
    } else {
        runtime_config.warn(&format!(
            "{} of {} package(s) failed",
            report.failures().len(),
            report.packages.len()
        ))?;
        Ok(1)
    }
}
