//! Decompile options and invocation argument handling.

use serde::{Deserialize, Serialize};

/// Flag the caller adds to mark an APK as the base of a split bundle.
///
/// It selects the split pipeline and is never forwarded to the tools.
pub const SPLIT_SENTINEL: &str = "has split-configs";

/// Options forwarded unchanged to the analysis collaborator for every package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompileOptions {
    /// Also decompile dex to Java sources (jadx)
    pub decompile_java: bool,
    /// Extra arguments for the Java decompiler
    pub extra_args: Vec<String>,
    /// Run quark malware analysis on each package
    pub quark_analysis: bool,
}

/// Removes the split sentinel from a caller's argument list.
///
/// Only the first occurrence is removed. An argument list without the
/// sentinel is returned unchanged.
pub fn strip_split_sentinel(mut args: Vec<String>) -> Vec<String> {
    if let Some(pos) = args.iter().position(|a| a == SPLIT_SENTINEL) {
        args.remove(pos);
    }
    args
}
