// ABOUTME: End-to-end tests for the deployment workflow against in-memory fakes.
// ABOUTME: Covers status ordering, terminal outcomes, the poll budget, and cleanup.

mod support;

use std::sync::Arc;
use std::time::Duration;

use deploy_relay::codehost::DeploymentState::{
    self, Error as ErrorState, Failure, InProgress, Pending, Queued, Success,
};
use deploy_relay::deploy::{
    CleanupRegistry, DeployErrorKind, Outcome, PollPolicy, Step, run,
};
use serde_json::json;
use support::{Poll, RecordingReporter, ScriptedTarget, created, request, snapshot};

async fn run_with(
    reporter: &Arc<RecordingReporter>,
    target: &ScriptedTarget,
    cleanup: &mut CleanupRegistry,
) -> Result<Outcome, deploy_relay::deploy::DeployError> {
    support::init_tracing();
    run(
        request(),
        Arc::clone(reporter),
        target,
        &PollPolicy::default(),
        cleanup,
    )
    .await
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn immediate_success_reports_pending_queued_success() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(42, "T0"),
        vec![snapshot(json!({"queued": "T0", "succeeded": "T1"}))],
    );
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Success);
    assert!(outcome.is_success());
    assert_eq!(reporter.states(), vec![Pending, Queued, Success]);

    let reports = reporter.reports();
    assert_eq!(reports[0].description, "Initializing deployment");
    assert_eq!(reports[1].description, "Deployment 42 queued at T0 (task 7)");
    assert_eq!(reports[2].description, "Deployment 42 succeeded at T1 (task 7)");
    assert!(reports[2].auto_inactive);
    assert!(reports[..2].iter().all(|r| !r.auto_inactive));
    assert!(cleanup.is_empty());
}

#[tokio::test(start_paused = true)]
async fn active_then_failed_reports_in_progress_then_failure() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(9, "T0"),
        vec![
            snapshot(json!({"queued": "T0", "active": "T1"})),
            snapshot(json!({"queued": "T0", "active": "T1", "failed": "T2"})),
        ],
    );
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(reporter.states(), vec![Pending, Queued, InProgress, Failure]);
    let reports = reporter.reports();
    assert_eq!(reports[2].description, "Deployment 9 began running at T1 (task 7)");
    assert_eq!(reports[3].description, "Deployment 9 FAILED at T2 (task 7)");
}

#[tokio::test(start_paused = true)]
async fn no_progress_times_out_after_sixty_polls() {
    let reporter = Arc::new(RecordingReporter::new());
    let target =
        ScriptedTarget::with_snapshots(created(5, "T0"), vec![snapshot(json!({"queued": "T0"}))]);
    let mut cleanup = CleanupRegistry::new();

    let started = tokio::time::Instant::now();
    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Timeout);
    assert!(!outcome.is_success());
    assert_eq!(target.status_calls(), 60);
    assert_eq!(reporter.states(), vec![Pending, Queued, ErrorState]);
    assert_eq!(
        reporter.reports()[2].description,
        "No deployment response after 5 minutes, aborting action"
    );
    assert!(started.elapsed() >= Duration::from_secs(300));
    assert!(cleanup.is_empty());
}

// =============================================================================
// Terminal precedence and the in-progress report
// =============================================================================

#[tokio::test(start_paused = true)]
async fn succeeded_takes_priority_over_failed_and_canceled() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(1, "T0"),
        vec![snapshot(
            json!({"active": "T1", "succeeded": "T3", "failed": "T2", "canceled": "T2"}),
        )],
    );
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(reporter.states(), vec![Pending, Queued, Success]);
}

#[tokio::test(start_paused = true)]
async fn canceled_reports_failure() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(3, "T0"),
        vec![snapshot(json!({"queued": "T0", "canceled": "T4"}))],
    );
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(reporter.states(), vec![Pending, Queued, Failure]);
    assert_eq!(
        reporter.reports()[2].description,
        "Deployment 3 CANCELED at T4 (task 7)"
    );
}

#[tokio::test(start_paused = true)]
async fn in_progress_is_reported_once_while_active_persists() {
    let reporter = Arc::new(RecordingReporter::new());
    let active = snapshot(json!({"queued": "T0", "active": "T1"}));
    let mut polls = vec![active; 10];
    polls.push(snapshot(json!({"queued": "T0", "active": "T1", "succeeded": "T9"})));
    let target = ScriptedTarget::with_snapshots(created(8, "T0"), polls);
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(reporter.states(), vec![Pending, Queued, InProgress, Success]);
    assert_eq!(target.status_calls(), 11);
}

#[tokio::test(start_paused = true)]
async fn active_forever_still_times_out_with_single_in_progress() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(8, "T0"),
        vec![snapshot(json!({"queued": "T0", "active": "T1"}))],
    );
    let mut cleanup = CleanupRegistry::new();

    let outcome = run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert_eq!(outcome, Outcome::Timeout);
    assert_eq!(reporter.states(), vec![Pending, Queued, InProgress, ErrorState]);
}

#[tokio::test(start_paused = true)]
async fn every_status_targets_the_record_and_links_the_run() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(
        created(42, "T0"),
        vec![
            snapshot(json!({"active": "T1"})),
            snapshot(json!({"active": "T1", "succeeded": "T2"})),
        ],
    );
    let mut cleanup = CleanupRegistry::new();

    run_with(&reporter, &target, &mut cleanup).await.unwrap();

    assert!(reporter.records().iter().all(|id| id.as_str() == "1001"));
    assert!(reporter.reports().iter().all(|r| {
        r.target_url.as_deref() == Some("https://github.com/octo/site/actions/runs/99")
    }));
    assert!(target.polled_handles().iter().all(|h| h.as_str() == "42"));
}

#[tokio::test(start_paused = true)]
async fn custom_budget_is_respected_and_described() {
    let reporter = Arc::new(RecordingReporter::new());
    let target =
        ScriptedTarget::with_snapshots(created(5, "T0"), vec![snapshot(json!({"queued": "T0"}))]);
    let mut cleanup = CleanupRegistry::new();
    let policy = PollPolicy::new(Duration::from_secs(3), 10);

    let outcome = run(request(), Arc::clone(&reporter), &target, &policy, &mut cleanup)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Timeout);
    assert_eq!(target.status_calls(), 10);
    assert_eq!(
        reporter.reports().last().unwrap().description,
        "No deployment response after 30 seconds, aborting action"
    );
}

// =============================================================================
// Fatal errors and cleanup
// =============================================================================

#[tokio::test(start_paused = true)]
async fn not_deployable_aborts_before_creating_a_deployment() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(created(1, "T0"), vec![]).not_deployable();
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::NotDeployable);
    assert_eq!(target.create_calls(), 0);
    assert_eq!(target.status_calls(), 0);
    assert_eq!(reporter.states(), vec![Pending]);
    assert_eq!(cleanup.len(), 1);

    let result = cleanup.run_all_and_clear().await;
    assert_eq!(result.ran, 1);
    assert!(result.all_succeeded());
    assert_eq!(reporter.states(), vec![Pending, ErrorState]);
    assert_eq!(
        reporter.reports()[1].description,
        "Deployment aborted unexpectedly, see the workflow log"
    );
}

#[tokio::test(start_paused = true)]
async fn sync_logical_error_is_fatal() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::with_snapshots(created(1, "T0"), vec![]).sync_fails();
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::ApiLogical);
    assert_eq!(err.step(), Step::Sync);
    assert_eq!(target.create_calls(), 0);
    assert_eq!(cleanup.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_error_while_polling_propagates_and_cleanup_reports_error_last() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::new(
        created(4, "T0"),
        vec![
            Poll::Snapshot(snapshot(json!({"queued": "T0", "active": "T1"}))),
            Poll::Transport,
            Poll::Snapshot(snapshot(json!({"succeeded": "T2"}))),
        ],
    );
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Transport);
    assert_eq!(err.step(), Step::PollStatus);
    assert_eq!(target.status_calls(), 2, "failed poll must not be retried");

    cleanup.run_all_and_clear().await;
    assert_eq!(reporter.states(), vec![Pending, Queued, InProgress, ErrorState]);
    assert!(cleanup.is_empty());
}

#[tokio::test(start_paused = true)]
async fn logical_error_while_polling_is_fatal() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::new(created(4, "T0"), vec![Poll::Logical]);
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::ApiLogical);
    assert_eq!(err.step(), Step::PollStatus);
}

#[tokio::test(start_paused = true)]
async fn failure_before_pending_registers_no_cleanup() {
    let reporter = Arc::new(RecordingReporter::failing_create());
    let target = ScriptedTarget::with_snapshots(created(1, "T0"), vec![]);
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.step(), Step::CreateRecord);
    assert_eq!(err.kind(), DeployErrorKind::Transport);
    assert!(cleanup.is_empty());
    assert!(reporter.states().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failing_pending_post_registers_no_cleanup() {
    let reporter = Arc::new(RecordingReporter::failing_on(Pending));
    let target = ScriptedTarget::with_snapshots(created(1, "T0"), vec![]);
    let mut cleanup = CleanupRegistry::new();

    let err = run_with(&reporter, &target, &mut cleanup).await.unwrap_err();

    assert_eq!(err.step(), Step::PostStatus(Pending));
    assert_eq!(reporter.records_created(), 1);
    assert!(cleanup.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cleanup_action_runs_exactly_once_after_abort() {
    let reporter = Arc::new(RecordingReporter::new());
    let target = ScriptedTarget::new(created(4, "T0"), vec![Poll::Transport]);
    let mut cleanup = CleanupRegistry::new();

    run_with(&reporter, &target, &mut cleanup).await.unwrap_err();
    cleanup.run_all_and_clear().await;
    cleanup.run_all_and_clear().await;

    let errors = reporter
        .states()
        .into_iter()
        .filter(|s| *s == ErrorState)
        .count();
    assert_eq!(errors, 1);
}

#[tokio::test(start_paused = true)]
async fn cleanup_action_never_runs_after_normal_completion() {
    for terminal in [json!({"succeeded": "T1"}), json!({"failed": "T1"})] {
        let reporter = Arc::new(RecordingReporter::new());
        let target = ScriptedTarget::with_snapshots(created(2, "T0"), vec![snapshot(terminal)]);
        let mut cleanup = CleanupRegistry::new();

        run_with(&reporter, &target, &mut cleanup).await.unwrap();
        let result = cleanup.run_all_and_clear().await;

        assert_eq!(result.ran, 0);
        assert!(!reporter.states().contains(&ErrorState));
    }
}

#[tokio::test(start_paused = true)]
async fn failing_cleanup_action_is_reported_not_raised() {
    let reporter = Arc::new(RecordingReporter::failing_on(DeploymentState::Error));
    let target = ScriptedTarget::new(created(4, "T0"), vec![Poll::Transport]);
    let mut cleanup = CleanupRegistry::new();

    run_with(&reporter, &target, &mut cleanup).await.unwrap_err();
    let result = cleanup.run_all_and_clear().await;

    assert_eq!(result.ran, 1);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].action, "report aborted deployment");
}
