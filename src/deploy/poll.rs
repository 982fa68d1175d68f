// ABOUTME: Poll loop that follows a queued deployment to a terminal state.
// ABOUTME: Maps server timestamps to GitHub statuses under a fixed poll budget.

use std::time::Duration;

use tracing::info;

use crate::codehost::{DeploymentState, StatusReporter};
use crate::target::{DeployTarget, DeploymentSnapshot, TerminalFact};
use crate::types::RemoteTimestamp;

use super::Deployment;
use super::describe;
use super::error::{DeployError, Step};
use super::state::{Outcome, Queued};
use super::transitions::post;

/// Fixed-interval polling with a maximum number of polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_POLLS: u32 = 60;

    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }

    /// Total time the loop sleeps before giving up.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_polls)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_POLLS)
    }
}

/// What one snapshot means for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// A terminal timestamp is present.
    Finished(TerminalFact),
    /// The deployment became active and `in_progress` has not been reported.
    Started(RemoteTimestamp),
    /// Nothing new.
    Waiting,
}

/// Classify a snapshot. Terminal facts are checked before `active`, so a
/// deployment that finished between two polls is never reported as merely
/// running.
pub fn evaluate(snapshot: &DeploymentSnapshot, in_progress_reported: bool) -> PollStep {
    if let Some(fact) = snapshot.terminal() {
        return PollStep::Finished(fact);
    }
    match &snapshot.timestamps.active {
        Some(at) if !in_progress_reported => PollStep::Started(at.clone()),
        _ => PollStep::Waiting,
    }
}

impl Deployment<Queued> {
    /// Poll the server until the deployment finishes or the budget runs out.
    ///
    /// Every state change is posted to GitHub; the final status is always
    /// `success`, `failure`, or `error`. Request failures are not retried.
    pub async fn poll<T, R>(
        self,
        target: &T,
        reporter: &R,
        policy: &PollPolicy,
    ) -> Result<Outcome, DeployError>
    where
        T: DeployTarget + ?Sized,
        R: StatusReporter + ?Sized,
    {
        let Queued {
            record,
            handle,
            task,
        } = &self.state;
        let mut in_progress_reported = false;
        let mut polls = 0u32;

        loop {
            polls += 1;
            if polls > policy.max_polls {
                let report = self.report(
                    DeploymentState::Error,
                    describe::timed_out(policy.budget()),
                );
                post(reporter, record, &report).await?;
                return Ok(Outcome::Timeout);
            }

            info!(
                "Sleeping for {} then checking status",
                humantime::format_duration(policy.interval)
            );
            tokio::time::sleep(policy.interval).await;

            let snapshot = target
                .deployment_status(handle)
                .await
                .map_err(DeployError::target(Step::PollStatus))?;

            // Fall back to the task reported at creation
            let task_id = snapshot.task_id.as_ref().or(task.as_ref());

            match evaluate(&snapshot, in_progress_reported) {
                PollStep::Finished(fact) => {
                    let description = describe::finished(handle, &fact, task_id);
                    let (report, outcome) = match fact {
                        TerminalFact::Succeeded(_) => (
                            self.report(DeploymentState::Success, description)
                                .auto_inactive(true),
                            Outcome::Success,
                        ),
                        TerminalFact::Failed(_) | TerminalFact::Canceled(_) => (
                            self.report(DeploymentState::Failure, description),
                            Outcome::Failure,
                        ),
                    };
                    post(reporter, record, &report).await?;
                    return Ok(outcome);
                }
                PollStep::Started(at) => {
                    let report = self.report(
                        DeploymentState::InProgress,
                        describe::started(handle, &at, task_id),
                    );
                    post(reporter, record, &report).await?;
                    in_progress_reported = true;
                }
                PollStep::Waiting => {
                    info!(
                        "No new deployment status updates for {} (task {})",
                        handle,
                        describe::task_label(task_id)
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(timestamps: serde_json::Value) -> DeploymentSnapshot {
        serde_json::from_value(json!({"task_id": "7", "timestamps": timestamps})).unwrap()
    }

    #[test]
    fn active_is_reported_once() {
        let snap = snapshot(json!({"queued": "T0", "active": "T1"}));
        assert_eq!(
            evaluate(&snap, false),
            PollStep::Started(RemoteTimestamp::new("T1"))
        );
        assert_eq!(evaluate(&snap, true), PollStep::Waiting);
    }

    #[test]
    fn terminal_beats_active() {
        let snap = snapshot(json!({"active": "T1", "failed": "T2"}));
        assert_eq!(
            evaluate(&snap, false),
            PollStep::Finished(TerminalFact::Failed(RemoteTimestamp::new("T2")))
        );
    }

    #[test]
    fn queued_only_is_waiting() {
        assert_eq!(
            evaluate(&snapshot(json!({"queued": "T0"})), false),
            PollStep::Waiting
        );
    }

    #[test]
    fn default_policy_is_five_minutes() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_polls, 60);
        assert_eq!(policy.budget(), Duration::from_secs(300));
    }
}
