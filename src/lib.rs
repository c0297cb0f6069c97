//! Split-APK bundle pipeline library
//!
//! This library drives an Android app distributed as a base APK plus
//! `split_config*` packages through three phases:
//! - Analyze: discover the bundle, persist `configs.yml`, decompile every package
//! - Rebuild: rebuild every project and gather the artifacts in one `dist/` directory
//! - Install: install the whole bundle with a single `adb install-multiple`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundle;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod tools;
pub mod utils;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
