//! Shared fixtures and fake collaborators for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use kodegen_bundler_split::error::{BundlerError, CliError, Result};
use kodegen_bundler_split::manifest::Manifest;
use kodegen_bundler_split::tools::{
    AnalysisJob, PackageAnalyzer, PackageRebuilder, ProcessRunner, ProcessSpec, RebuildOptions,
    RebuildOptionsProvider, WorkspaceNotifier,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Creates `names` as small files inside `dir`.
pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"PK\x03\x04").unwrap();
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn failure(what: &str) -> BundlerError {
    BundlerError::Cli(CliError::ExecutionFailed {
        command: what.to_string(),
        reason: "exit code 1".to_string(),
    })
}

/// One recorded analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisCall {
    pub file_name: String,
    pub working_dir: PathBuf,
    pub invocation_args: Vec<String>,
    pub flag: bool,
    /// Whether the manifest was already on disk when the call started
    pub manifest_present: bool,
}

/// Records calls; fails for the file names in `fail`.
#[derive(Default)]
pub struct RecordingAnalyzer {
    pub calls: Mutex<Vec<AnalysisCall>>,
    pub fail: HashSet<String>,
}

impl RecordingAnalyzer {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            fail: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn file_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.file_name.clone())
            .collect()
    }
}

#[async_trait]
impl PackageAnalyzer for RecordingAnalyzer {
    async fn process_package(&self, job: &AnalysisJob<'_>) -> Result<()> {
        let file_name = job
            .file_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let manifest_present = job
            .working_dir
            .parent()
            .map(|root| Manifest::path_for(root).exists())
            .unwrap_or(false);

        self.calls.lock().unwrap().push(AnalysisCall {
            file_name: file_name.clone(),
            working_dir: job.working_dir.to_path_buf(),
            invocation_args: job.invocation_args.to_vec(),
            flag: job.flag,
            manifest_present,
        });

        if self.fail.contains(&file_name) {
            return Err(failure("apktool d"));
        }
        std::fs::create_dir_all(job.working_dir)?;
        Ok(())
    }
}

/// Writes `<project>/dist/<project name>.apk` like `apktool b` would.
#[derive(Default)]
pub struct FakeRebuilder {
    pub descriptors: Mutex<Vec<PathBuf>>,
    pub options: Mutex<Vec<RebuildOptions>>,
    /// Project directory names whose rebuild fails
    pub fail: HashSet<String>,
    /// Project directory names that "succeed" without producing an artifact
    pub no_artifact: HashSet<String>,
}

#[async_trait]
impl PackageRebuilder for FakeRebuilder {
    async fn rebuild_package(&self, descriptor: &Path, options: &RebuildOptions) -> Result<()> {
        self.descriptors.lock().unwrap().push(descriptor.to_path_buf());
        self.options.lock().unwrap().push(options.clone());

        let project = descriptor.parent().unwrap();
        let name = project.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail.contains(&name) {
            return Err(failure("apktool b"));
        }
        if self.no_artifact.contains(&name) {
            return Ok(());
        }

        let dist = project.join("dist");
        std::fs::create_dir_all(&dist)?;
        std::fs::write(dist.join(format!("{name}.apk")), name.as_bytes())?;
        Ok(())
    }
}

/// Returns fixed options, or cancels.
pub struct StaticOptions(pub Option<RebuildOptions>);

#[async_trait]
impl RebuildOptionsProvider for StaticOptions {
    async fn request_rebuild_options(&self) -> Result<Option<RebuildOptions>> {
        Ok(self.0.clone())
    }
}

/// Records process requests instead of running them.
#[derive(Default)]
pub struct RecordingRunner {
    pub specs: Mutex<Vec<ProcessSpec>>,
    pub fail: bool,
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run_process(&self, spec: &ProcessSpec) -> Result<()> {
        self.specs.lock().unwrap().push(spec.clone());
        if self.fail {
            return Err(failure(&spec.command_line()));
        }
        Ok(())
    }
}

/// Records workspace hand-offs.
#[derive(Default)]
pub struct RecordingNotifier {
    pub opened: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl WorkspaceNotifier for RecordingNotifier {
    async fn open_workspace(&self, root: &Path) -> Result<()> {
        self.opened.lock().unwrap().push(root.to_path_buf());
        Ok(())
    }
}
