// ABOUTME: Deploy-target side of a deployment: sync, create, and poll.
// ABOUTME: Defines the DeployTarget seam and the cPanel UAPI implementation.

mod cpanel;
mod error;
mod snapshot;

pub use cpanel::CpanelClient;
pub use error::TargetError;
pub use snapshot::{
    DeploymentCreated, DeploymentSnapshot, SyncResult, TerminalFact, Timestamps,
};

use async_trait::async_trait;

use crate::types::DeployHandle;

/// Operations against the server that performs the deployment.
#[async_trait]
pub trait DeployTarget: Send + Sync {
    /// Pull `branch` into the checkout at `repository_root`.
    async fn sync_repository(
        &self,
        repository_root: &str,
        branch: &str,
    ) -> Result<SyncResult, TargetError>;

    /// Queue a deployment of the checkout at `repository_root`.
    ///
    /// Callers must only invoke this after a sync reported `deployable`.
    async fn create_deployment(&self, repository_root: &str)
    -> Result<DeploymentCreated, TargetError>;

    /// Read the current state of a deployment. Side-effect free.
    async fn deployment_status(
        &self,
        handle: &DeployHandle,
    ) -> Result<DeploymentSnapshot, TargetError>;
}
