//! Rebuild option providers.
//!
//! The interactive provider asks once per rebuild run which apktool build
//! flags to use. Escaping the prompt cancels the whole rebuild.

use super::{RebuildOptions, RebuildOptionsProvider};
use crate::error::{BundlerError, CliError, Result};
use async_trait::async_trait;
use inquire::{InquireError, MultiSelect};

/// apktool build flags offered by the interactive prompt.
pub const BUILD_FLAGS: &[(&str, &str)] = &[
    ("--debug", "Set android:debuggable to true"),
    ("--force-all", "Skip change detection and build all files"),
    ("--no-crunch", "Disable crunching of resource files"),
    ("--net-sec-conf", "Add a generic network security configuration"),
    ("--use-aapt1", "Use aapt instead of aapt2"),
];

/// Asks the user on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptOptionsProvider;

fn flag_label(flag: &str, help: &str) -> String {
    format!("{flag}  ({help})")
}

#[async_trait]
impl RebuildOptionsProvider for PromptOptionsProvider {
    async fn request_rebuild_options(&self) -> Result<Option<RebuildOptions>> {
        let labels: Vec<String> = BUILD_FLAGS
            .iter()
            .map(|(flag, help)| flag_label(flag, help))
            .collect();

        // inquire blocks on terminal input
        let answer = tokio::task::spawn_blocking(move || {
            MultiSelect::new("Select apktool build options", labels)
                .with_help_message("Space to toggle, Enter to rebuild, Esc to cancel")
                .prompt()
        })
        .await
        .map_err(|e| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: "request_rebuild_options".to_string(),
                reason: format!("Task panicked: {}", e),
            })
        })?;

        match answer {
            Ok(selected) => {
                let args = BUILD_FLAGS
                    .iter()
                    .filter(|(flag, help)| selected.contains(&flag_label(flag, help)))
                    .map(|(flag, _)| flag.to_string())
                    .collect();
                Ok(Some(RebuildOptions { args }))
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(BundlerError::Cli(CliError::ExecutionFailed {
                command: "request_rebuild_options".to_string(),
                reason: e.to_string(),
            })),
        }
    }
}

/// Options fixed on the command line; never cancels.
#[derive(Debug, Default, Clone)]
pub struct FixedOptionsProvider {
    options: RebuildOptions,
}

impl FixedOptionsProvider {
    /// Uses `args` for every rebuild.
    pub fn new(args: Vec<String>) -> Self {
        Self {
            options: RebuildOptions { args },
        }
    }
}

#[async_trait]
impl RebuildOptionsProvider for FixedOptionsProvider {
    async fn request_rebuild_options(&self) -> Result<Option<RebuildOptions>> {
        Ok(Some(self.options.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_provider_returns_args() {
        let provider = FixedOptionsProvider::new(vec!["--debug".to_string()]);
        let options = provider.request_rebuild_options().await.unwrap();
        assert_eq!(
            options,
            Some(RebuildOptions {
                args: vec!["--debug".to_string()]
            })
        );
    }
}
