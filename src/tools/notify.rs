//! Host environment notification.

use super::WorkspaceNotifier;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Reports the ready bundle root through the log and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier {
    quiet: bool,
}

impl LogNotifier {
    /// `quiet` suppresses the stdout line; the log entry is always written.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

#[async_trait]
impl WorkspaceNotifier for LogNotifier {
    async fn open_workspace(&self, root: &Path) -> Result<()> {
        log::info!("Bundle workspace ready: {}", root.display());
        if !self.quiet {
            println!("Workspace ready: {}", root.display());
        }
        Ok(())
    }
}
