//! Split bundle pipeline orchestration.
//!
//! The pipeline runs in three phases that usually live in separate
//! invocations, linked only by the manifest written in phase 1:
//!
//! 1. [`Analyzer`] - discover the bundle, write `configs.yml`, decompile each package
//! 2. [`Rebuilder`] - rebuild each project concurrently, gather artifacts in `dist/`
//! 3. [`Installer`] - install every artifact with one `install-multiple` request
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_split::pipeline::{AnalyzeRequest, Analyzer, PipelinePolicy};
//! use kodegen_bundler_split::tools::{ApktoolAnalyzer, CommandRunner, LogNotifier, ToolPaths};
//! use std::sync::Arc;
//!
//! # async fn example() -> kodegen_bundler_split::Result<()> {
//! let analyzer = ApktoolAnalyzer::new(ToolPaths::default(), Arc::new(CommandRunner::default()));
//! let notifier = LogNotifier::default();
//!
//! let report = Analyzer::new(&analyzer, &notifier, PipelinePolicy::default())
//!     .run(&AnalyzeRequest {
//!         base_package_path: "/apks/app.apk".into(),
//!         output_root: "/work/app".into(),
//!         invocation_args: vec![],
//!         decompile_options: Default::default(),
//!     })
//!     .await?;
//!
//! println!("{} package(s) analyzed", report.succeeded().len());
//! # Ok(())
//! # }
//! ```

mod analyze;
mod install;
mod policy;
mod rebuild;
mod report;

pub use analyze::{AnalyzeRequest, Analyzer};
pub use install::Installer;
pub use policy::{FailurePolicy, PipelinePolicy};
pub use rebuild::{RebuildOutcome, Rebuilder};
pub use report::{PackageOutcome, PackageStatus, Phase, PhaseReport};
