//! Command line interface for the split bundle pipeline.
//!
//! This module provides the CLI for the three pipeline phases,
//! with argument parsing, logging setup, command execution and user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::bundle::DecompileOptions;
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(&args);

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(&args);
    let tools = runtime_config.tools(&args);
    runtime_config.verbose_println(&format!("Tools: {:?}", tools))?;

    match args.command {
        Command::Analyze {
            ref apk,
            ref output,
            decompile_java,
            ref jadx_args,
            quark,
            args: ref apktool_args,
        } => {
            commands::analyze::execute(
                apk,
                output.as_deref(),
                apktool_args.clone(),
                DecompileOptions {
                    decompile_java,
                    extra_args: jadx_args.clone(),
                    quark_analysis: quark,
                },
                tools,
                &runtime_config,
            )
            .await
        }
        Command::Rebuild {
            ref manifest,
            ref rebuild_args,
            no_prompt,
        } => {
            commands::rebuild::execute(
                manifest,
                rebuild_args.clone(),
                no_prompt,
                tools,
                &runtime_config,
            )
            .await
        }
        Command::Install {
            ref manifest,
            dry_run,
        } => commands::install::execute(manifest, dry_run, tools, &runtime_config).await,
    }
}

/// Initializes `env_logger`; `RUST_LOG` overrides the flag-derived default.
fn init_logging(args: &Args) {
    let default_filter = if args.verbose {
        "debug"
    } else if args.quiet || args.json {
        "warn"
    } else {
        "info"
    };

    // A second init (e.g. in tests) is harmless
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}
