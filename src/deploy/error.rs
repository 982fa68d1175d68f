// ABOUTME: Error types for the deployment workflow.
// ABOUTME: Tags each failure with the step it happened in and a matchable kind.

use std::fmt;

use crate::codehost::{CodeHostError, DeploymentState};
use crate::http::HttpErrorKind;
use crate::target::TargetError;

/// Workflow step an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateRecord,
    PostStatus(DeploymentState),
    Sync,
    CreateDeployment,
    PollStatus,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateRecord => f.write_str("creating the GitHub deployment"),
            Step::PostStatus(state) => write!(f, "posting the {state} status"),
            Step::Sync => f.write_str("updating the repository on the server"),
            Step::CreateDeployment => f.write_str("creating the server deployment"),
            Step::PollStatus => f.write_str("checking the deployment status"),
        }
    }
}

/// Fatal deployment errors. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("{step} failed: {source}")]
    CodeHost {
        step: Step,
        #[source]
        source: CodeHostError,
    },

    #[error("{step} failed: {source}")]
    Target {
        step: Step,
        #[source]
        source: TargetError,
    },

    /// Sync succeeded but the checkout cannot be deployed: it has local
    /// changes or is missing its `.cpanel.yml`.
    #[error("repository {repository_root} is not deployable, aborting")]
    NotDeployable { repository_root: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Network failure or non-2xx HTTP status from either service.
    Transport,
    /// The deploy target answered with `status: 0`.
    ApiLogical,
    /// The checkout on the deploy target is not deployable.
    NotDeployable,
    /// A 2xx response whose payload could not be understood.
    UnexpectedResponse,
}

impl DeployError {
    pub(crate) fn code_host(step: Step) -> impl FnOnce(CodeHostError) -> Self {
        move |source| DeployError::CodeHost { step, source }
    }

    pub(crate) fn target(step: Step) -> impl FnOnce(TargetError) -> Self {
        move |source| DeployError::Target { step, source }
    }

    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::CodeHost { source, .. } => match source {
                CodeHostError::Http(e) => http_kind(e.kind()),
                CodeHostError::MissingRecordId => DeployErrorKind::UnexpectedResponse,
            },
            DeployError::Target { source, .. } => match source {
                TargetError::Http(e) => http_kind(e.kind()),
                TargetError::ApiLogical { .. } => DeployErrorKind::ApiLogical,
                TargetError::Envelope { .. } => DeployErrorKind::UnexpectedResponse,
            },
            DeployError::NotDeployable { .. } => DeployErrorKind::NotDeployable,
        }
    }

    /// The step that failed.
    pub fn step(&self) -> Step {
        match self {
            DeployError::CodeHost { step, .. } | DeployError::Target { step, .. } => *step,
            DeployError::NotDeployable { .. } => Step::Sync,
        }
    }
}

fn http_kind(kind: HttpErrorKind) -> DeployErrorKind {
    match kind {
        HttpErrorKind::Transport | HttpErrorKind::Status | HttpErrorKind::InvalidHeader => {
            DeployErrorKind::Transport
        }
        HttpErrorKind::Decode => DeployErrorKind::UnexpectedResponse,
    }
}
