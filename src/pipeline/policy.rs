//! Failure policy shared by the pipeline phases.

/// What to do when one package's collaborator fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep processing the remaining packages
    #[default]
    Continue,
    /// Stop at the first failure and fail the phase
    Abort,
}

/// Escalation switches for the pipeline's best-effort steps.
///
/// The defaults keep every best-effort step non-fatal: stale manifest
/// removal and per-artifact relocation only log their failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelinePolicy {
    /// Per-package analysis/rebuild failures
    pub package_failure: FailurePolicy,
    /// Fail analyze when a stale manifest exists but cannot be removed
    pub strict_cleanup: bool,
    /// Fail rebuild when any artifact cannot be moved into `dist`
    pub strict_relocation: bool,
}

impl PipelinePolicy {
    /// Escalates every best-effort step and aborts on the first package failure.
    pub fn strict() -> Self {
        Self {
            package_failure: FailurePolicy::Abort,
            strict_cleanup: true,
            strict_relocation: true,
        }
    }

    /// Whether a package failure aborts the phase.
    pub fn aborts_on_failure(&self) -> bool {
        self.package_failure == FailurePolicy::Abort
    }
}
