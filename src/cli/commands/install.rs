//! `install` command.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::pipeline::Installer;
use crate::tools::{CommandRunner, ToolPaths};
use std::path::Path;

/// Runs phase 3 and returns the process exit code.
pub async fn execute(
    manifest: &Path,
    dry_run: bool,
    tools: ToolPaths,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let manifest_path = Manifest::locate(manifest).await;
    let runner = CommandRunner::new(runtime_config.timeout());
    let installer = Installer::new(&runner, tools.adb);

    if dry_run {
        let plan = installer.plan(&Manifest::read(&manifest_path).await?);
        if runtime_config.json() {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "command": plan.command,
                    "args": plan.args,
                }))?
            );
        } else {
            println!("{}", plan.command_line());
        }
        return Ok(0);
    }

    runtime_config.progress(&format!("Installing bundle {}", manifest_path.display()))?;
    let spec = installer.run(&manifest_path).await?;
    runtime_config.success(&format!("Installed {} package(s)", spec.args.len() - 2))?;
    Ok(0)
}
