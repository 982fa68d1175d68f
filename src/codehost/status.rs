// ABOUTME: Deployment status states and the status report payload.
// ABOUTME: Mirrors the GitHub deployment-statuses request body.

use serde::Serialize;
use std::fmt;

/// State of a GitHub deployment status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Pending,
    Queued,
    InProgress,
    Success,
    Failure,
    Error,
}

impl DeploymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Pending => "pending",
            DeploymentState::Queued => "queued",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Success => "success",
            DeploymentState::Failure => "failure",
            DeploymentState::Error => "error",
        }
    }

    /// Whether no further status follows this one within a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentState::Success | DeploymentState::Failure | DeploymentState::Error
        )
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry appended to a deployment's status timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub state: DeploymentState,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    /// Marks earlier non-transient statuses inactive. Only sent when set.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub auto_inactive: bool,
}

impl StatusReport {
    pub fn new(state: DeploymentState, description: impl Into<String>) -> Self {
        Self {
            state,
            description: description.into(),
            target_url: None,
            auto_inactive: false,
        }
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn auto_inactive(mut self, auto_inactive: bool) -> Self {
        self.auto_inactive = auto_inactive;
        self
    }
}
