//! Bundle topology: which files form one split-APK application.
//!
//! # Module Organization
//!
//! - [`discovery`] - Split listing and per-package working directories
//! - [`options`] - Decompile options and the split sentinel argument

pub mod discovery;
pub mod options;

pub use discovery::{Bundle, PackageEntry, SPLIT_PREFIX, discover, list_split_packages};
pub use options::{DecompileOptions, SPLIT_SENTINEL, strip_split_sentinel};
