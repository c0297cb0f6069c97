//! Phase 2: rebuild every package and gather the artifacts in one `dist` directory.

use super::policy::PipelinePolicy;
use super::report::{PackageOutcome, PackageStatus, Phase, PhaseReport};
use crate::error::{BundlerError, CliError, Result};
use crate::manifest::{Manifest, ManifestEntry};
use crate::tools::{PackageRebuilder, RebuildOptionsProvider};
use crate::utils::fs::{DirState, ensure_dir_all, move_file};
use futures::future::join_all;
use std::path::Path;

/// How a rebuild run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The user declined to pick rebuild options; nothing was touched
    Cancelled,
    /// Every package was attempted
    Completed(PhaseReport),
}

/// Rebuild orchestrator.
///
/// Rebuilds are dispatched together and awaited as a group; the unified
/// `dist` directory is only created, and artifacts only moved, once every
/// rebuild has finished.
pub struct Rebuilder<'a> {
    rebuilder: &'a dyn PackageRebuilder,
    options: &'a dyn RebuildOptionsProvider,
    policy: PipelinePolicy,
}

impl<'a> Rebuilder<'a> {
    /// Creates the orchestrator.
    pub fn new(
        rebuilder: &'a dyn PackageRebuilder,
        options: &'a dyn RebuildOptionsProvider,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            rebuilder,
            options,
            policy,
        }
    }

    /// Runs the rebuild phase against the manifest at `manifest_path`.
    pub async fn run(&self, manifest_path: &Path) -> Result<RebuildOutcome> {
        let manifest = Manifest::read(manifest_path).await?;

        let Some(options) = self.options.request_rebuild_options().await? else {
            log::info!("Rebuild cancelled by user");
            return Ok(RebuildOutcome::Cancelled);
        };

        log::info!(
            "Rebuilding {} package(s) with options {:?}",
            manifest.packages.len(),
            options.args
        );

        let descriptors: Vec<_> = manifest
            .packages
            .iter()
            .map(ManifestEntry::descriptor_path)
            .collect();
        let results = join_all(
            descriptors
                .iter()
                .map(|descriptor| self.rebuilder.rebuild_package(descriptor, &options)),
        )
        .await;

        let mut report = PhaseReport::new(Phase::Rebuild, manifest.location().to_path_buf());
        for (entry, result) in manifest.packages.iter().zip(results) {
            match result {
                Ok(()) => report.packages.push(PackageOutcome::succeeded(&entry.file_name)),
                Err(e) => {
                    log::error!("Rebuilding {} failed: {}", entry.file_name, e);
                    if self.policy.aborts_on_failure() {
                        return Err(BundlerError::PackageProcessing {
                            package: entry.file_name.clone(),
                            reason: e.to_string(),
                        });
                    }
                    report
                        .packages
                        .push(PackageOutcome::failed(&entry.file_name, e.to_string()));
                }
            }
        }

        self.relocate(&manifest, &mut report).await?;
        Ok(RebuildOutcome::Completed(report))
    }

    /// Moves each rebuilt artifact into the unified `dist` directory.
    ///
    /// Moves are independent: a failed move is recorded and the rest continue.
    async fn relocate(&self, manifest: &Manifest, report: &mut PhaseReport) -> Result<()> {
        let dist_dir = manifest.dist_dir();
        match ensure_dir_all(&dist_dir).await {
            Ok(DirState::Created) => log::info!("Created dist directory: {}", dist_dir.display()),
            Ok(DirState::Reused) => {
                log::info!("dist directory already exists, reusing: {}", dist_dir.display())
            }
            Err(e) => {
                return Err(BundlerError::Cli(CliError::ExecutionFailed {
                    command: "create dist directory".to_string(),
                    reason: format!("Failed to create {}: {}", dist_dir.display(), e),
                }));
            }
        }

        let mut first_failure = None;
        for (entry, outcome) in manifest.packages.iter().zip(report.packages.iter_mut()) {
            if !outcome.is_success() {
                continue;
            }

            let from = entry.artifact_path();
            let to = dist_dir.join(&entry.file_name);
            match move_file(&from, &to).await {
                Ok(()) => {
                    log::info!("✓ {}", to.display());
                    outcome.artifact = Some(to);
                }
                Err(e) => {
                    let error = BundlerError::ArtifactRelocation {
                        from,
                        to,
                        reason: e.to_string(),
                    };
                    log::warn!("{}", error);
                    outcome.status = PackageStatus::RelocationFailed {
                        reason: error.to_string(),
                    };
                    first_failure.get_or_insert(error);
                }
            }
        }

        match first_failure {
            Some(error) if self.policy.strict_relocation => Err(error),
            _ => Ok(()),
        }
    }
}
