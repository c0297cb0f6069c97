//! `analyze` command.

use super::print_report;
use crate::bundle::DecompileOptions;
use crate::cli::RuntimeConfig;
use crate::error::{BundlerError, CliError, Result};
use crate::pipeline::{AnalyzeRequest, Analyzer};
use crate::tools::{ApktoolAnalyzer, CommandRunner, LogNotifier, ToolPaths};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bundle root used when `--output` is not given: `<apk dir>/<apk stem>`.
pub fn default_output_root(apk: &Path) -> Option<PathBuf> {
    let stem = apk.file_stem()?;
    Some(apk.parent()?.join(stem))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .map_err(|e| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Cannot resolve {}: {}", path.display(), e),
            })
        })?
        .into_owned())
}

/// Runs phase 1 and returns the process exit code.
pub async fn execute(
    apk: &Path,
    output: Option<&Path>,
    args: Vec<String>,
    decompile_options: DecompileOptions,
    tools: ToolPaths,
    runtime_config: &RuntimeConfig,
) -> Result<i32> {
    let apk = absolute(apk)?;
    let output_root = match output {
        Some(dir) => absolute(dir)?,
        None => default_output_root(&apk).ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Cannot derive an output directory from {}", apk.display()),
            })
        })?,
    };

    runtime_config.progress(&format!(
        "Analyzing bundle {} into {}",
        apk.display(),
        output_root.display()
    ))?;

    let runner = Arc::new(CommandRunner::new(runtime_config.timeout()));
    let analyzer = ApktoolAnalyzer::new(tools, runner);
    let notifier = LogNotifier::new(runtime_config.json());

    let report = Analyzer::new(&analyzer, &notifier, runtime_config.policy())
        .run(&AnalyzeRequest {
            base_package_path: apk,
            output_root,
            invocation_args: args,
            decompile_options,
        })
        .await?;

    print_report(&report, runtime_config)
}
