//! Durable bundle manifest (`configs.yml`).
//!
//! The manifest is the only state shared between the analyze, rebuild and
//! install phases, which usually run in separate invocations. It is written
//! once per analyze run and is read-only afterwards.
//!
//! On disk the package list is stored as two parallel sequences, `apks` and
//! `projectsDir`, kept in plain YAML so it can be inspected and repaired by
//! hand. In memory it is a single ordered list of [`ManifestEntry`] records, so
//! the positional pairing cannot drift once a file has been read.

use crate::bundle::{Bundle, DecompileOptions};
use crate::error::{BundlerError, Result};
use crate::utils::fs::remove_file_if_exists;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the bundle root.
pub const MANIFEST_FILE_NAME: &str = "configs.yml";

/// Name of the unified directory collecting every rebuilt artifact.
pub const DIST_DIR_NAME: &str = "dist";

/// Project descriptor apktool writes into every decompiled project.
pub const PROJECT_DESCRIPTOR: &str = "apktool.yml";

/// On-disk layout. Keys are fixed; there is no version field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDocument {
    root_dir: PathBuf,
    parent_path: PathBuf,
    apk_file_path: PathBuf,
    args: Vec<String>,
    decompile_java: bool,
    jadx_args: Vec<String>,
    quark_analysis: bool,
    apks: Vec<String>,
    projects_dir: Vec<PathBuf>,
}

/// One package as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Bare file name of the package
    pub file_name: String,
    /// Decompiled project directory
    pub working_dir: PathBuf,
}

impl ManifestEntry {
    /// apktool's project descriptor inside the working directory.
    pub fn descriptor_path(&self) -> PathBuf {
        self.working_dir.join(PROJECT_DESCRIPTOR)
    }

    /// Where the rebuild tool leaves this package's artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.working_dir.join(DIST_DIR_NAME).join(&self.file_name)
    }
}

/// Persisted description of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Bundle root directory
    pub root_dir: PathBuf,
    /// Directory that held the raw packages
    pub parent_path: PathBuf,
    /// Base package path
    pub base_package_path: PathBuf,
    /// Caller arguments, sentinel already removed
    pub invocation_args: Vec<String>,
    /// Decompile options
    pub decompile_options: DecompileOptions,
    /// Packages, base first
    pub packages: Vec<ManifestEntry>,
    location: PathBuf,
}

impl Manifest {
    /// Manifest path for a bundle root.
    pub fn path_for(root_dir: &Path) -> PathBuf {
        root_dir.join(MANIFEST_FILE_NAME)
    }

    /// Builds the manifest describing `bundle`.
    pub fn from_bundle(bundle: &Bundle) -> Self {
        Self {
            root_dir: bundle.root_dir.clone(),
            parent_path: bundle.parent_path.clone(),
            base_package_path: bundle.base_package_path.clone(),
            invocation_args: bundle.invocation_args.clone(),
            decompile_options: bundle.decompile_options.clone(),
            packages: bundle
                .packages()
                .iter()
                .map(|p| ManifestEntry {
                    file_name: p.file_name.clone(),
                    working_dir: p.working_dir.clone(),
                })
                .collect(),
            location: Self::path_for(&bundle.root_dir),
        }
    }

    /// Path this manifest was read from, or will be written to.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Unified dist directory, next to the manifest.
    pub fn dist_dir(&self) -> PathBuf {
        self.location
            .parent()
            .map(|dir| dir.join(DIST_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DIST_DIR_NAME))
    }

    /// Bare file names in manifest order.
    pub fn package_file_names(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.file_name.as_str()).collect()
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let (apks, projects_dir): (Vec<String>, Vec<PathBuf>) = self
            .packages
            .iter()
            .map(|p| (p.file_name.clone(), p.working_dir.clone()))
            .unzip();

        let document = ManifestDocument {
            root_dir: self.root_dir.clone(),
            parent_path: self.parent_path.clone(),
            apk_file_path: self.base_package_path.clone(),
            args: self.invocation_args.clone(),
            decompile_java: self.decompile_options.decompile_java,
            jadx_args: self.decompile_options.extra_args.clone(),
            quark_analysis: self.decompile_options.quark_analysis,
            apks,
            projects_dir,
        };

        Ok(serde_yaml::to_string(&document)?)
    }

    /// Parses a manifest read from `location`.
    ///
    /// # Errors
    ///
    /// * [`BundlerError::ManifestCorrupt`] - invalid YAML or a missing field
    /// * [`BundlerError::ManifestSchema`] - `apks` and `projectsDir` differ in length, or are empty
    pub fn from_yaml(yaml: &str, location: &Path) -> Result<Self> {
        let document: ManifestDocument =
            serde_yaml::from_str(yaml).map_err(|e| BundlerError::ManifestCorrupt {
                path: location.to_path_buf(),
                reason: e.to_string(),
            })?;

        if document.apks.len() != document.projects_dir.len() {
            return Err(BundlerError::ManifestSchema {
                path: location.to_path_buf(),
                reason: format!(
                    "apks lists {} package(s) but projectsDir lists {}",
                    document.apks.len(),
                    document.projects_dir.len()
                ),
            });
        }
        if document.apks.is_empty() {
            return Err(BundlerError::ManifestSchema {
                path: location.to_path_buf(),
                reason: "apks is empty; a bundle always has a base package".to_string(),
            });
        }

        let packages = document
            .apks
            .into_iter()
            .zip(document.projects_dir)
            .map(|(file_name, working_dir)| ManifestEntry {
                file_name,
                working_dir,
            })
            .collect();

        Ok(Self {
            root_dir: document.root_dir,
            parent_path: document.parent_path,
            base_package_path: document.apk_file_path,
            invocation_args: document.args,
            decompile_options: DecompileOptions {
                decompile_java: document.decompile_java,
                extra_args: document.jadx_args,
                quark_analysis: document.quark_analysis,
            },
            packages,
            location: location.to_path_buf(),
        })
    }

    /// Writes the manifest to [`Manifest::location`], replacing any stale copy.
    ///
    /// Removal of the old file is best-effort: failures are logged and the
    /// write still proceeds. The new content is written to a sibling temp file
    /// and renamed into place.
    pub async fn write(&self) -> Result<PathBuf> {
        remove_stale(&self.location, false).await?;

        let write_error = |reason: String| BundlerError::ManifestWrite {
            path: self.location.clone(),
            reason,
        };

        let yaml = self.to_yaml().map_err(|e| write_error(e.to_string()))?;

        let temp_path = self.location.with_extension("yml.tmp");
        tokio::fs::write(&temp_path, yaml)
            .await
            .map_err(|e| write_error(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.location).await {
            if let Err(cleanup) = remove_file_if_exists(&temp_path).await {
                log::warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(write_error(e.to_string()));
        }

        log::info!("Wrote bundle manifest: {}", self.location.display());
        Ok(self.location.clone())
    }

    /// Reads and validates the manifest at `path`.
    ///
    /// # Errors
    ///
    /// * [`BundlerError::ManifestMissing`] - no file at `path`
    /// * [`BundlerError::ManifestCorrupt`] - unreadable, unparsable or missing fields
    /// * [`BundlerError::ManifestSchema`] - inconsistent package sequences
    pub async fn read(path: &Path) -> Result<Self> {
        let yaml = match tokio::fs::read_to_string(path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BundlerError::ManifestMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(BundlerError::ManifestCorrupt {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let manifest = Self::from_yaml(&yaml, path)?;
        log::debug!(
            "Read bundle manifest {} ({} package(s))",
            path.display(),
            manifest.packages.len()
        );
        Ok(manifest)
    }

    /// Resolves a user-supplied path to a manifest file.
    ///
    /// Accepts the manifest itself or the bundle root that contains it.
    pub async fn locate(path: &Path) -> PathBuf {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => Self::path_for(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Deletes a stale manifest.
///
/// A missing file is never an error. Other failures are logged, and only
/// returned when `escalate` is set.
pub async fn remove_stale(path: &Path, escalate: bool) -> Result<()> {
    match remove_file_if_exists(path).await {
        Ok(true) => {
            log::debug!("Removed stale manifest: {}", path.display());
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(e) => {
            log::warn!("Failed to delete stale manifest {}: {}", path.display(), e);
            if escalate {
                Err(BundlerError::ManifestWrite {
                    path: path.to_path_buf(),
                    reason: format!("stale manifest could not be removed: {}", e),
                })
            } else {
                Ok(())
            }
        }
    }
}
