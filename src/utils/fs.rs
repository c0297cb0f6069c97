//! File system utilities for the bundle pipeline.
//!
//! Provides idempotent directory creation, tolerant removal and
//! cross-filesystem moves with comprehensive error handling.

use std::{io, path::Path};
use tokio::fs;

/// Outcome of an idempotent directory creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// Directory was created by this call
    Created,
    /// Directory already existed and is reused
    Reused,
}

/// Creates all of the directories of the specified path.
///
/// Reports whether the leaf directory already existed so callers can log reuse.
/// Fails if the path exists but is not a directory.
pub async fn ensure_dir_all(path: &Path) -> io::Result<DirState> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(DirState::Reused),
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", path.display()),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    // create_dir_all is already idempotent - succeeds even if a concurrent caller won
    fs::create_dir_all(path).await?;
    Ok(DirState::Created)
}

/// Removes a file, treating "not found" as success.
///
/// Returns `true` when a file was actually removed.
pub async fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false), // Idempotent
        Err(e) => Err(e),
    }
}

/// Moves a regular file, replacing any existing file at the destination.
///
/// Tries an atomic rename first. When source and destination live on
/// different filesystems the rename fails, so fall back to copy + remove.
pub async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", from.display()),
        ));
    }

    #[cfg(windows)]
    {
        // rename() fails on Windows if the target exists
        remove_file_if_exists(to).await?;
    }

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), falling back to copy",
                from.display(),
                to.display(),
                rename_err
            );
            fs::copy(from, to).await?;
            fs::remove_file(from).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_dir_all_reports_reuse() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("a").join("b");

        assert_eq!(ensure_dir_all(&dir).await.unwrap(), DirState::Created);
        assert_eq!(ensure_dir_all(&dir).await.unwrap(), DirState::Reused);
    }

    #[tokio::test]
    async fn ensure_dir_all_rejects_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("dist");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_dir_all(&file).await.is_err());
    }

    #[tokio::test]
    async fn remove_missing_file_is_ok() {
        let temp = tempfile::tempdir().unwrap();
        let removed = remove_file_if_exists(&temp.path().join("configs.yml"))
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn move_file_replaces_destination() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("new.apk");
        let to = temp.path().join("app.apk");
        std::fs::write(&from, b"new").unwrap();
        std::fs::write(&to, b"old").unwrap();

        move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"new");
    }
}
