// ABOUTME: Code-host side of a deployment: the record and its status timeline.
// ABOUTME: Defines the StatusReporter seam and the GitHub implementation.

mod error;
mod github;
mod status;

pub use error::CodeHostError;
pub use github::{DEFAULT_API_URL, GitHubClient};
pub use status::{DeploymentState, StatusReport};

use async_trait::async_trait;

use crate::types::{RecordId, Revision};

/// Creates deployment records and appends status entries to them.
///
/// This is a relay: it does not check that states arrive in a legal order.
/// The orchestrator owns ordering.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Create a deployment record for `revision` in `environment`.
    async fn create_deployment_record(
        &self,
        revision: &Revision,
        environment: &str,
    ) -> Result<RecordId, CodeHostError>;

    /// Append a status entry to a deployment record.
    async fn post_status(&self, record: &RecordId, report: &StatusReport)
    -> Result<(), CodeHostError>;
}
