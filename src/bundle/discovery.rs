//! Split package discovery for a base APK.
//!
//! Splits are identified purely by file name: regular files next to the base
//! APK whose name starts with [`SPLIT_PREFIX`]. Contents are never inspected.
//!
//! Listing order is whatever the filesystem returns and is never re-sorted.
//! It is only guaranteed stable within one call; later phases take their order
//! from the manifest, not from a fresh listing.

use super::options::{DecompileOptions, strip_split_sentinel};
use crate::error::{BundlerError, Result};
use std::path::{Path, PathBuf};

/// File name prefix shared by every split config package.
pub const SPLIT_PREFIX: &str = "split_config";

/// One package of a bundle and the directory its decompiled project lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Bare file name, e.g. `split_config.arm64_v8a.apk`
    pub file_name: String,
    /// Full path of the raw package
    pub file_path: PathBuf,
    /// `<root>/<file stem>`
    pub working_dir: PathBuf,
}

impl PackageEntry {
    /// Builds the entry for `file_path`, placing its working directory under `root_dir`.
    pub fn new(file_path: &Path, root_dir: &Path) -> Result<Self> {
        let file_name = file_name_of(file_path)?;
        Ok(Self {
            working_dir: working_dir_for(file_path, root_dir)?,
            file_path: file_path.to_path_buf(),
            file_name,
        })
    }
}

/// A base package plus its splits, ready to be written as a manifest.
///
/// Packages are kept in a single ordered list; index 0 is always the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Output root holding every working directory
    pub root_dir: PathBuf,
    /// Directory that holds the raw package files
    pub parent_path: PathBuf,
    /// Path of the base package
    pub base_package_path: PathBuf,
    /// Caller arguments with the split sentinel removed
    pub invocation_args: Vec<String>,
    /// Decompile options shared by every package
    pub decompile_options: DecompileOptions,
    packages: Vec<PackageEntry>,
}

impl Bundle {
    /// Sets the caller's argument list, dropping the split sentinel.
    pub fn with_invocation_args(mut self, args: Vec<String>) -> Self {
        self.invocation_args = strip_split_sentinel(args);
        self
    }

    /// Sets decompile options.
    pub fn with_decompile_options(mut self, options: DecompileOptions) -> Self {
        self.decompile_options = options;
        self
    }

    /// All packages, base first then splits in discovery order.
    pub fn packages(&self) -> &[PackageEntry] {
        &self.packages
    }

    /// The base package entry.
    pub fn base(&self) -> &PackageEntry {
        // Construction always pushes the base first
        &self.packages[0]
    }

    /// Split package entries in discovery order.
    pub fn splits(&self) -> &[PackageEntry] {
        &self.packages[1..]
    }

    /// Split package paths in discovery order.
    pub fn split_package_paths(&self) -> Vec<PathBuf> {
        self.splits().iter().map(|p| p.file_path.clone()).collect()
    }

    /// Working directories index-aligned with [`Bundle::packages`].
    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.packages.iter().map(|p| p.working_dir.clone()).collect()
    }

    /// Bare file names index-aligned with [`Bundle::packages`].
    pub fn package_file_names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.file_name.clone()).collect()
    }
}

/// Discovers the bundle rooted at `base_package_path`.
///
/// # Arguments
///
/// * `parent_path` - Directory containing the base APK and its splits
/// * `base_package_path` - The base APK
/// * `output_root` - Directory receiving one working directory per package
///
/// # Errors
///
/// [`BundlerError::Discovery`] if `parent_path` cannot be listed or an entry
/// cannot be inspected.
pub async fn discover(
    parent_path: &Path,
    base_package_path: &Path,
    output_root: &Path,
) -> Result<Bundle> {
    let splits = list_split_packages(parent_path).await?;

    let mut packages = Vec::with_capacity(splits.len() + 1);
    packages.push(PackageEntry::new(base_package_path, output_root)?);
    for split in splits {
        // Only the base's own directory is listed, so the file name identifies it
        if split.file_name() == base_package_path.file_name() {
            log::debug!("Base package matches split prefix, not counted twice: {}", split.display());
            continue;
        }
        packages.push(PackageEntry::new(&split, output_root)?);
    }

    log::info!(
        "Discovered {} split package(s) for {}",
        packages.len() - 1,
        base_package_path.display()
    );

    Ok(Bundle {
        root_dir: output_root.to_path_buf(),
        parent_path: parent_path.to_path_buf(),
        base_package_path: base_package_path.to_path_buf(),
        invocation_args: Vec::new(),
        decompile_options: DecompileOptions::default(),
        packages,
    })
}

/// Lists split package paths in `parent_path`, in directory-listing order.
pub async fn list_split_packages(parent_path: &Path) -> Result<Vec<PathBuf>> {
    let discovery_error = |reason: String| BundlerError::Discovery {
        path: parent_path.to_path_buf(),
        reason,
    };

    let mut entries = tokio::fs::read_dir(parent_path)
        .await
        .map_err(|e| discovery_error(e.to_string()))?;

    let mut splits = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| discovery_error(e.to_string()))?
    {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(SPLIT_PREFIX) {
            continue;
        }

        let path = entry.path();
        // Follows symlinks, so a link to a regular split file still counts
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| discovery_error(format!("{}: {}", path.display(), e)))?;

        if metadata.is_file() {
            log::debug!("  split: {}", path.display());
            splits.push(path);
        } else {
            log::debug!("  skipping non-regular entry: {}", path.display());
        }
    }

    Ok(splits)
}

/// `root_dir/<file stem>` for a package path.
pub fn working_dir_for(file_path: &Path, root_dir: &Path) -> Result<PathBuf> {
    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| BundlerError::Discovery {
            path: file_path.to_path_buf(),
            reason: "package path has no UTF-8 file stem".to_string(),
        })?;
    Ok(root_dir.join(stem))
}

fn file_name_of(file_path: &Path) -> Result<String> {
    file_path
        .file_name()
        .and_then(|s| s.to_str())
        .map(String::from)
        .ok_or_else(|| BundlerError::Discovery {
            path: file_path.to_path_buf(),
            reason: "package path has no UTF-8 file name".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_dir_strips_last_extension_only() {
        let dir = working_dir_for(
            Path::new("/apks/split_config.arm64_v8a.apk"),
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/out/split_config.arm64_v8a"));
    }

    #[test]
    fn entry_keeps_bare_file_name() {
        let entry = PackageEntry::new(Path::new("/apks/app.apk"), Path::new("/out")).unwrap();
        assert_eq!(entry.file_name, "app.apk");
        assert_eq!(entry.working_dir, PathBuf::from("/out/app"));
    }
}
