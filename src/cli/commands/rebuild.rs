//! `rebuild` command.

use super::print_report;
use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::pipeline::{RebuildOutcome, Rebuilder};
use crate::tools::{
    ApktoolRebuilder, CommandRunner, FixedOptionsProvider, PromptOptionsProvider,
    RebuildOptionsProvider, ToolPaths,
};
use std::path::Path;
use std::sync::Arc;

/// Runs phase 2 and returns the process exit code.
///
/// Options given with `--rebuild-arg` (or `--no-prompt`) skip the prompt.
pub async fn execute(
    manifest: &Path,
    rebuild_args: Vec<String>,
    no_prompt: bool,
    tools: ToolPaths,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let manifest_path = Manifest::locate(manifest).await;
    runtime_config.progress(&format!("Rebuilding bundle {}", manifest_path.display()))?;

    let provider: Box<dyn RebuildOptionsProvider> = if no_prompt || !rebuild_args.is_empty() {
        Box::new(FixedOptionsProvider::new(rebuild_args))
    } else {
        Box::new(PromptOptionsProvider)
    };

    let runner = Arc::new(CommandRunner::new(runtime_config.timeout()));
    let rebuilder = ApktoolRebuilder::new(tools, runner);

    match Rebuilder::new(&rebuilder, provider.as_ref(), runtime_config.policy())
        .run(&manifest_path)
        .await?
    {
        RebuildOutcome::Cancelled => {
            runtime_config.warn("Rebuild cancelled")?;
            Ok(0)
        }
        RebuildOutcome::Completed(report) => print_report(&report, runtime_config),
    }
}
