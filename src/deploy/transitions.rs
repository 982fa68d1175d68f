// ABOUTME: State transition methods for the deployment workflow.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::sync::Arc;

use tracing::info;

use crate::codehost::{DeploymentState, StatusReport, StatusReporter};
use crate::target::DeployTarget;
use crate::types::RecordId;

use super::cleanup::{CleanupAction, CleanupRegistry};
use super::describe;
use super::error::{DeployError, Step};
use super::state::{Deployable, Initialized, Pending, Queued};
use super::Deployment;

impl<S> Deployment<S> {
    /// Internal helper to move to the next state.
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            state,
        }
    }

    /// Build a status report linked back to the workflow run.
    pub(crate) fn report(&self, state: DeploymentState, description: impl Into<String>) -> StatusReport {
        StatusReport::new(state, description).target_url(self.request.run_url.clone())
    }
}

/// Post a status, tagging any failure with the state being reported.
pub(crate) async fn post<R: StatusReporter + ?Sized>(
    reporter: &R,
    record: &RecordId,
    report: &StatusReport,
) -> Result<(), DeployError> {
    info!("Reporting {}: {}", report.state, report.description);
    reporter
        .post_status(record, report)
        .await
        .map_err(DeployError::code_host(Step::PostStatus(report.state)))
}

impl Deployment<Initialized> {
    /// Create the GitHub deployment record and mark it `pending`.
    ///
    /// Once `pending` is posted, an action that reports the run as aborted
    /// is registered with `cleanup`.
    pub async fn open<R: StatusReporter + ?Sized + 'static>(
        self,
        reporter: &Arc<R>,
        cleanup: &mut CleanupRegistry,
    ) -> Result<Deployment<Pending>, DeployError> {
        let request = &self.request;
        info!(
            "Creating deployment of {} to {}",
            request.revision, request.environment
        );
        let record = reporter
            .create_deployment_record(&request.revision, &request.environment)
            .await
            .map_err(DeployError::code_host(Step::CreateRecord))?;
        info!("Created GitHub deployment {}", record);

        let pending = self.report(DeploymentState::Pending, describe::INITIALIZING);
        post(reporter.as_ref(), &record, &pending).await?;

        let aborted = self.report(DeploymentState::Error, describe::ABORTED);
        let reporter = Arc::clone(reporter);
        let abort_record = record.clone();
        cleanup.register(CleanupAction::new(
            "report aborted deployment",
            move || async move { reporter.post_status(&abort_record, &aborted).await },
        ));

        Ok(self.transition(Pending { record }))
    }
}

impl Deployment<Pending> {
    /// Update the server checkout and confirm it can be deployed.
    ///
    /// A `status: 0` answer and a non-deployable checkout are both fatal.
    pub async fn sync<T: DeployTarget + ?Sized>(
        self,
        target: &T,
    ) -> Result<Deployment<Deployable>, DeployError> {
        let request = &self.request;
        info!(
            "Updating {} to branch {}",
            request.repository_root, request.branch
        );
        let sync = target
            .sync_repository(&request.repository_root, &request.branch)
            .await
            .map_err(DeployError::target(Step::Sync))?;

        if !sync.deployable {
            return Err(DeployError::NotDeployable {
                repository_root: request.repository_root.clone(),
            });
        }

        let record = self.state.record.clone();
        Ok(self.transition(Deployable { record }))
    }
}

impl Deployment<Deployable> {
    /// Create the server deployment and mark the record `queued`.
    pub async fn create<T, R>(
        self,
        target: &T,
        reporter: &R,
    ) -> Result<Deployment<Queued>, DeployError>
    where
        T: DeployTarget + ?Sized,
        R: StatusReporter + ?Sized,
    {
        let created = target
            .create_deployment(&self.request.repository_root)
            .await
            .map_err(DeployError::target(Step::CreateDeployment))?;

        let queued = self.report(
            DeploymentState::Queued,
            describe::queued(
                &created.deploy_id,
                created.timestamps.queued.as_ref(),
                created.task_id.as_ref(),
            ),
        );
        post(reporter, &self.state.record, &queued).await?;

        let record = self.state.record.clone();
        Ok(self.transition(Queued {
            record,
            handle: created.deploy_id,
            task: created.task_id,
        }))
    }
}
