// ABOUTME: End-to-end deployment workflow driven through the state machine.
// ABOUTME: Clears the cleanup registry only when a terminal state is reached normally.

use std::sync::Arc;

use crate::codehost::StatusReporter;
use crate::target::DeployTarget;

use super::cleanup::CleanupRegistry;
use super::error::DeployError;
use super::poll::PollPolicy;
use super::request::DeploymentRequest;
use super::state::Outcome;
use super::Deployment;

/// Run one deployment: record, `pending`, sync, create, `queued`, poll.
///
/// On `Ok` the registry has been cleared. On `Err` the registered actions
/// are left in place for the caller's error boundary to run.
pub async fn run<R, T>(
    request: DeploymentRequest,
    reporter: Arc<R>,
    target: &T,
    policy: &PollPolicy,
    cleanup: &mut CleanupRegistry,
) -> Result<Outcome, DeployError>
where
    R: StatusReporter + ?Sized + 'static,
    T: DeployTarget + ?Sized,
{
    let deployment = Deployment::new(request).open(&reporter, cleanup).await?;
    let deployment = deployment.sync(target).await?;
    let deployment = deployment.create(target, reporter.as_ref()).await?;
    let outcome = deployment.poll(target, reporter.as_ref(), policy).await?;

    cleanup.clear();
    Ok(outcome)
}
