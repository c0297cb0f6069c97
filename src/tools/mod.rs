//! External collaborators of the bundle pipeline.
//!
//! The orchestrators only see the traits defined here. Decompilation,
//! rebuilding, option selection, device install and workspace hand-off are
//! provided by implementations that wrap external tools:
//!
//! - [`apktool`] - apktool/jadx/quark backed analyzer and rebuilder
//! - [`process`] - child process runner, also the install transport
//! - [`prompt`] - rebuild option providers (interactive and fixed)
//! - [`notify`] - host environment notification
//! - [`detection`] - locating tool executables

pub mod apktool;
pub mod detection;
pub mod notify;
pub mod process;
pub mod prompt;

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use apktool::{ApktoolAnalyzer, ApktoolRebuilder};
pub use detection::ToolPaths;
pub use notify::LogNotifier;
pub use process::{CommandRunner, DEFAULT_PROCESS_TIMEOUT};
pub use prompt::{FixedOptionsProvider, PromptOptionsProvider};

/// Everything the analysis collaborator needs for one package.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisJob<'a> {
    /// Raw package to decompile
    pub file_path: &'a Path,
    /// Output project directory
    pub working_dir: &'a Path,
    /// Caller arguments for the decompiler
    pub invocation_args: &'a [String],
    /// Also produce Java sources
    pub decompile_java: bool,
    /// Extra Java decompiler arguments
    pub extra_args: &'a [String],
    /// Run quark analysis
    pub quark_analysis: bool,
    /// Pass-through flag of the analysis tool; always `false` for bundle packages
    pub flag: bool,
}

/// User-selected options for rebuilding decompiled projects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildOptions {
    /// Extra arguments for the rebuild tool
    pub args: Vec<String>,
}

/// A single external command request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Short name used in logs and errors
    pub name: String,
    /// Progress line reported before the command starts
    pub report: String,
    /// Executable
    pub command: PathBuf,
    /// Arguments
    pub args: Vec<String>,
}

impl ProcessSpec {
    /// Command line rendered for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.command.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Decompiles and analyzes one package.
#[async_trait]
pub trait PackageAnalyzer: Send + Sync {
    /// Processes `job.file_path` into `job.working_dir`.
    async fn process_package(&self, job: &AnalysisJob<'_>) -> Result<()>;
}

/// Rebuilds one package from its decompiled project.
///
/// Implementations must be safe to run concurrently for distinct working
/// directories. The artifact is expected at `<working_dir>/dist/<file name>`.
#[async_trait]
pub trait PackageRebuilder: Send + Sync {
    /// Rebuilds the project described by `descriptor` (its `apktool.yml`).
    async fn rebuild_package(&self, descriptor: &Path, options: &RebuildOptions) -> Result<()>;
}

/// Supplies rebuild options, typically by asking the user.
#[async_trait]
pub trait RebuildOptionsProvider: Send + Sync {
    /// `Ok(None)` means the user cancelled.
    async fn request_rebuild_options(&self) -> Result<Option<RebuildOptions>>;
}

/// Runs external commands.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `spec` to completion; a non-zero exit is an error.
    async fn run_process(&self, spec: &ProcessSpec) -> Result<()>;
}

/// Tells the surrounding environment a bundle is ready to inspect.
#[async_trait]
pub trait WorkspaceNotifier: Send + Sync {
    /// Hands `root` over as the active workspace.
    async fn open_workspace(&self, root: &Path) -> Result<()>;
}
