//! Phase 3: install every rebuilt package in one multi-package transaction.

use crate::error::{BundlerError, Result};
use crate::manifest::Manifest;
use crate::tools::{ProcessRunner, ProcessSpec};
use std::path::{Path, PathBuf};

/// Install orchestrator.
///
/// The whole bundle goes to the device in a single `install-multiple`
/// request; either every package installs or the request fails as a whole.
pub struct Installer<'a> {
    transport: &'a dyn ProcessRunner,
    adb: PathBuf,
}

impl<'a> Installer<'a> {
    /// Creates the orchestrator issuing requests through `transport` with `adb`.
    pub fn new(transport: &'a dyn ProcessRunner, adb: PathBuf) -> Self {
        Self { transport, adb }
    }

    /// The install request for `manifest`, artifacts in manifest order.
    pub fn plan(&self, manifest: &Manifest) -> ProcessSpec {
        let dist_dir = manifest.dist_dir();
        let mut args = vec!["install-multiple".to_string(), "-r".to_string()];
        args.extend(
            manifest
                .packages
                .iter()
                .map(|p| dist_dir.join(&p.file_name).to_string_lossy().into_owned()),
        );

        ProcessSpec {
            name: "adb".to_string(),
            report: format!(
                "Installing {} package(s) of {}",
                manifest.packages.len(),
                manifest.base_package_path.display()
            ),
            command: self.adb.clone(),
            args,
        }
    }

    /// Reads the manifest at `manifest_path` and installs the bundle.
    ///
    /// Returns the request that was issued.
    pub async fn run(&self, manifest_path: &Path) -> Result<ProcessSpec> {
        let manifest = Manifest::read(manifest_path).await?;
        let spec = self.plan(&manifest);

        for artifact in spec.args.iter().skip(2) {
            if !tokio::fs::try_exists(artifact).await.unwrap_or(false) {
                log::warn!("Rebuilt artifact missing, install will likely fail: {}", artifact);
            }
        }

        self.transport
            .run_process(&spec)
            .await
            .map_err(|e| BundlerError::InstallTransport {
                command: spec.command_line(),
                reason: e.to_string(),
            })?;

        log::info!("Installed {} package(s)", manifest.packages.len());
        Ok(spec)
    }
}
