// ABOUTME: Immutable description of one deployment run.
// ABOUTME: Built once from configuration and only read afterwards.

use crate::types::Revision;

/// Branch synced on the server when none is configured.
pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Commit being deployed.
    pub revision: Revision,
    /// GitHub environment name.
    pub environment: String,
    /// Checkout path on the server.
    pub repository_root: String,
    /// Branch the server checkout is updated to.
    pub branch: String,
    /// Workflow run URL attached to every status.
    pub run_url: String,
}

impl DeploymentRequest {
    pub fn new(
        revision: Revision,
        environment: impl Into<String>,
        repository_root: impl Into<String>,
        run_url: impl Into<String>,
    ) -> Self {
        Self {
            revision,
            environment: environment.into(),
            repository_root: repository_root.into(),
            branch: DEFAULT_BRANCH.to_string(),
            run_url: run_url.into(),
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }
}
