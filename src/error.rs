//! Comprehensive error types for split-bundle operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.
//! Variants map one-to-one onto the pipeline's failure taxonomy: discovery, manifest
//! persistence, per-package processing, artifact relocation and install transport.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Parent directory of the bundle could not be listed
    #[error("Failed to discover split packages in {}: {reason}", path.display())]
    Discovery {
        /// Directory that was being listed
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Manifest could not be serialized or persisted
    #[error("Failed to write bundle manifest {}: {reason}", path.display())]
    ManifestWrite {
        /// Target manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// No manifest at the expected location
    #[error("Bundle manifest not found: {}", path.display())]
    ManifestMissing {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Manifest exists but is unreadable, unparsable or missing fields
    #[error("Bundle manifest {} is corrupt: {reason}", path.display())]
    ManifestCorrupt {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Manifest parsed but its package sequences are inconsistent
    #[error("Bundle manifest {} has an invalid layout: {reason}", path.display())]
    ManifestSchema {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// One package's analysis or rebuild collaborator failed
    #[error("Processing {package} failed: {reason}")]
    PackageProcessing {
        /// Bare file name of the package
        package: String,
        /// Reason for the error
        reason: String,
    },

    /// A rebuilt artifact could not be moved into the unified dist directory
    #[error("Failed to move {} to {}: {reason}", from.display(), to.display())]
    ArtifactRelocation {
        /// Per-package artifact path
        from: PathBuf,
        /// Destination inside the unified dist directory
        to: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// The multi-package install request failed as a whole
    #[error("Install transport failed: {command} - {reason}")]
    InstallTransport {
        /// Command that was executed
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Discovery { path, .. } => vec![
                format!("Check that {} exists and is readable", path.display()),
                "Pass the base APK that sits next to its split_config*.apk files".to_string(),
            ],
            Self::ManifestWrite { path, .. } => vec![
                format!("Check write permissions for {}", path.display()),
                "Free disk space and re-run analyze".to_string(),
            ],
            Self::ManifestMissing { .. } => vec![
                "Run the analyze command first to create configs.yml".to_string(),
                "Pass the bundle output directory or the configs.yml path itself".to_string(),
            ],
            Self::ManifestCorrupt { .. } | Self::ManifestSchema { .. } => vec![
                "Inspect configs.yml: apks and projectsDir must list the same packages in the same order".to_string(),
                "Re-run analyze to regenerate the manifest".to_string(),
            ],
            Self::PackageProcessing { .. } => vec![
                "Check the tool output above for the failing package".to_string(),
                "Verify apktool (and jadx/quark when enabled) are installed and on PATH".to_string(),
            ],
            Self::ArtifactRelocation { .. } => vec![
                "Check that the rebuilt artifact exists under the package's dist/ directory".to_string(),
            ],
            Self::InstallTransport { .. } => vec![
                "Check that exactly one device is connected: adb devices".to_string(),
                "Rebuilt splits must be signed with the same key as the base APK".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    ///
    /// Per-package failures leave sibling packages usable; everything else
    /// aborts the current phase.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PackageProcessing { .. } | Self::ArtifactRelocation { .. }
        )
    }
}
