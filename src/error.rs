// ABOUTME: Application-wide error types for deploy-relay.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

use crate::deploy::DeployError;
use crate::types::{RepoSlugError, RevisionError, RootPatternError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid revision: {0}")]
    Revision(#[from] RevisionError),

    #[error("invalid repository: {0}")]
    RepoSlug(#[from] RepoSlugError),

    #[error("invalid repository root pattern: {0}")]
    RootPattern(#[from] RootPatternError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

pub type Result<T> = std::result::Result<T, Error>;
