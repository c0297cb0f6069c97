//! External tool detection.
//!
//! Resolves the executables the pipeline shells out to. An explicit path
//! always wins; otherwise the tool is looked up on `PATH`, and as a last
//! resort the bare name is used so the spawn error names the missing tool.

use std::path::{Path, PathBuf};

/// Resolved executables for every external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// apktool (decompile + rebuild)
    pub apktool: PathBuf,
    /// jadx (Java sources)
    pub jadx: PathBuf,
    /// quark (malware analysis)
    pub quark: PathBuf,
    /// adb (device install)
    pub adb: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            apktool: PathBuf::from("apktool"),
            jadx: PathBuf::from("jadx"),
            quark: PathBuf::from("quark"),
            adb: PathBuf::from("adb"),
        }
    }
}

impl ToolPaths {
    /// Resolves every tool, preferring the explicit overrides.
    pub fn resolve(
        apktool: Option<&Path>,
        jadx: Option<&Path>,
        quark: Option<&Path>,
        adb: Option<&Path>,
    ) -> Self {
        Self {
            apktool: resolve_tool("apktool", apktool),
            jadx: resolve_tool("jadx", jadx),
            quark: resolve_tool("quark", quark),
            adb: resolve_tool("adb", adb),
        }
    }
}

/// Resolves one tool executable.
pub fn resolve_tool(name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        log::debug!("Using configured {}: {}", name, path.display());
        return path.to_path_buf();
    }

    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            path
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            PathBuf::from(name)
        }
    }
}
