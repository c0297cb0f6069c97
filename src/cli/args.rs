//! Command line argument parsing and validation.
//!
//! This module provides comprehensive CLI argument parsing using clap,
//! with proper validation and error handling.

use crate::pipeline::{FailurePolicy, PipelinePolicy};
use crate::tools::ToolPaths;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Split-APK bundle pipeline
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_split",
    version,
    about = "Analyze, rebuild and install split-APK bundles",
    long_about = "Drives a base APK and its split_config*.apk siblings through apktool as one app.

The three phases usually run at different times and share state only through
the bundle manifest (configs.yml) written by analyze.

Usage:
  kodegen_bundler_split analyze ./apks/base.apk --output ./work/app -- -r
  kodegen_bundler_split rebuild ./work/app
  kodegen_bundler_split install ./work/app/configs.yml

Exit code 0 = every package of the phase succeeded (or the rebuild was cancelled)."
)]
pub struct Args {
    /// Phase to run
    #[command(subcommand)]
    pub command: Command,

    /// Stop at the first package whose analysis or rebuild fails
    #[arg(long, global = true)]
    pub abort_on_error: bool,

    /// Escalate every best-effort step (stale manifest removal, artifact moves) to an error
    #[arg(long, global = true)]
    pub strict: bool,

    /// Timeout for a single tool invocation, in seconds
    #[arg(
        long,
        global = true,
        env = "KODEGEN_SPLIT_TIMEOUT_SECS",
        default_value_t = 1800,
        value_name = "SECS"
    )]
    pub timeout_secs: u64,

    /// apktool executable
    #[arg(long, global = true, env = "APKTOOL_PATH", value_name = "PATH")]
    pub apktool: Option<PathBuf>,

    /// jadx executable
    #[arg(long, global = true, env = "JADX_PATH", value_name = "PATH")]
    pub jadx: Option<PathBuf>,

    /// quark executable
    #[arg(long, global = true, env = "QUARK_PATH", value_name = "PATH")]
    pub quark: Option<PathBuf>,

    /// adb executable
    #[arg(long, global = true, env = "ADB_PATH", value_name = "PATH")]
    pub adb: Option<PathBuf>,

    /// Print the phase report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Pipeline phases.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover the bundle, write configs.yml and decompile every package
    Analyze {
        /// Base APK; split_config*.apk files next to it join the bundle
        #[arg(value_name = "APK")]
        apk: PathBuf,

        /// Bundle root (default: <apk dir>/<apk name>)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also decompile to Java sources with jadx
        #[arg(long)]
        decompile_java: bool,

        /// Extra jadx argument (repeatable)
        #[arg(long = "jadx-arg", value_name = "ARG", allow_hyphen_values = true)]
        jadx_args: Vec<String>,

        /// Run quark analysis on every package
        #[arg(long)]
        quark: bool,

        /// Arguments forwarded to apktool decode
        #[arg(last = true, value_name = "APKTOOL_ARGS")]
        args: Vec<String>,
    },

    /// Rebuild every package and collect the artifacts in <bundle root>/dist
    Rebuild {
        /// configs.yml, or the bundle root containing it
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// apktool build argument (repeatable); skips the interactive prompt
        #[arg(long = "rebuild-arg", value_name = "ARG", allow_hyphen_values = true)]
        rebuild_args: Vec<String>,

        /// Rebuild without prompting for options
        #[arg(long)]
        no_prompt: bool,
    },

    /// Install every rebuilt package in one adb install-multiple transaction
    Install {
        /// configs.yml, or the bundle root containing it
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Print the install command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("--verbose and --quiet cannot be used together".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("--timeout-secs must be greater than zero".to_string());
        }

        if let Command::Analyze { apk, .. } = &self.command {
            if apk.file_name().is_none() {
                return Err(format!("Not a package file: {}", apk.display()));
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
    policy: PipelinePolicy,
    timeout: Duration,
    json: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet || args.json);

        let mut policy = if args.strict {
            PipelinePolicy::strict()
        } else {
            PipelinePolicy::default()
        };
        if args.abort_on_error {
            policy.package_failure = FailurePolicy::Abort;
        }

        Self {
            output,
            policy,
            timeout: Duration::from_secs(args.timeout_secs),
            json: args.json,
        }
    }
}

impl RuntimeConfig {
    /// Failure policy for the pipeline
    pub fn policy(&self) -> PipelinePolicy {
        self.policy
    }

    /// Per-tool timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether reports are printed as JSON
    pub fn json(&self) -> bool {
        self.json
    }

    /// Resolves tool executables from flags, environment and PATH
    pub fn tools(&self, args: &Args) -> ToolPaths {
        ToolPaths::resolve(
            args.apktool.as_deref(),
            args.jadx.as_deref(),
            args.quark.as_deref(),
            args.adb.as_deref(),
        )
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
