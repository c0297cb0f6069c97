//! Phase 1: discover the bundle, persist its manifest, analyze every package.

use super::policy::PipelinePolicy;
use super::report::{PackageOutcome, Phase, PhaseReport};
use crate::bundle::{Bundle, DecompileOptions, discover};
use crate::error::{BundlerError, Result};
use crate::manifest::{self, Manifest};
use crate::tools::{AnalysisJob, PackageAnalyzer, WorkspaceNotifier};
use crate::utils::fs::{DirState, ensure_dir_all};
use std::path::{Path, PathBuf};

/// Input of one analyze run.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Base APK; its directory is scanned for splits
    pub base_package_path: PathBuf,
    /// Bundle root receiving the manifest and one project per package
    pub output_root: PathBuf,
    /// Caller arguments, possibly still carrying the split sentinel
    pub invocation_args: Vec<String>,
    /// Decompile options for every package
    pub decompile_options: DecompileOptions,
}

/// Analyze orchestrator.
///
/// Every stage is awaited before the next one reads its output: the bundle
/// root exists before the manifest is built, the manifest is on disk before
/// any package is analyzed, and packages are analyzed strictly one at a time,
/// base first. Decompilers are resource heavy, so sequential dispatch also
/// keeps their output readable.
pub struct Analyzer<'a> {
    analyzer: &'a dyn PackageAnalyzer,
    notifier: &'a dyn WorkspaceNotifier,
    policy: PipelinePolicy,
}

impl<'a> Analyzer<'a> {
    /// Creates the orchestrator.
    pub fn new(
        analyzer: &'a dyn PackageAnalyzer,
        notifier: &'a dyn WorkspaceNotifier,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            analyzer,
            notifier,
            policy,
        }
    }

    /// Runs the analyze phase.
    ///
    /// # Errors
    ///
    /// * [`BundlerError::Discovery`] - nothing has been written yet
    /// * [`BundlerError::ManifestWrite`] - root or manifest could not be created;
    ///   no package is analyzed
    /// * [`BundlerError::PackageProcessing`] - only under the abort policy
    pub async fn run(&self, request: &AnalyzeRequest) -> Result<PhaseReport> {
        let parent_path = parent_of(&request.base_package_path)?;
        let root = request.output_root.as_path();

        // Validates the parent directory before anything is touched
        discover(&parent_path, &request.base_package_path, root).await?;

        let manifest_path = Manifest::path_for(root);
        manifest::remove_stale(&manifest_path, self.policy.strict_cleanup).await?;

        match ensure_dir_all(root).await {
            Ok(DirState::Created) => log::info!("Created bundle root: {}", root.display()),
            Ok(DirState::Reused) => log::info!("Reusing bundle root: {}", root.display()),
            Err(e) => {
                return Err(BundlerError::ManifestWrite {
                    path: manifest_path,
                    reason: format!("cannot create bundle root {}: {}", root.display(), e),
                });
            }
        }

        // The manifest describes the tree as it exists after the root was created
        let bundle = discover(&parent_path, &request.base_package_path, root)
            .await?
            .with_invocation_args(request.invocation_args.clone())
            .with_decompile_options(request.decompile_options.clone());

        let manifest_path = Manifest::from_bundle(&bundle).write().await?;

        let report = self.analyze_packages(&bundle, manifest_path).await?;

        if let Err(e) = self.notifier.open_workspace(root).await {
            log::warn!("Failed to open workspace {}: {}", root.display(), e);
        }

        Ok(report)
    }

    async fn analyze_packages(&self, bundle: &Bundle, manifest_path: PathBuf) -> Result<PhaseReport> {
        let mut report = PhaseReport::new(Phase::Analyze, manifest_path);
        let options = &bundle.decompile_options;

        for package in bundle.packages() {
            let job = AnalysisJob {
                file_path: &package.file_path,
                working_dir: &package.working_dir,
                invocation_args: &bundle.invocation_args,
                decompile_java: options.decompile_java,
                extra_args: &options.extra_args,
                quark_analysis: options.quark_analysis,
                flag: false,
            };

            match self.analyzer.process_package(&job).await {
                Ok(()) => {
                    log::info!("Analyzed {}", package.file_name);
                    report.packages.push(PackageOutcome::succeeded(&package.file_name));
                }
                Err(e) => {
                    log::error!("Analyzing {} failed: {}", package.file_name, e);
                    if self.policy.aborts_on_failure() {
                        return Err(BundlerError::PackageProcessing {
                            package: package.file_name.clone(),
                            reason: e.to_string(),
                        });
                    }
                    report
                        .packages
                        .push(PackageOutcome::failed(&package.file_name, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

fn parent_of(base_package_path: &Path) -> Result<PathBuf> {
    base_package_path
        .parent()
        .map(|p| {
            if p.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                p.to_path_buf()
            }
        })
        .ok_or_else(|| BundlerError::Discovery {
            path: base_package_path.to_path_buf(),
            reason: "base package has no parent directory".to_string(),
        })
}
