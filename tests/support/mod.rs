// ABOUTME: Test support utilities.
// ABOUTME: Provides in-memory GitHub and cPanel fakes for workflow tests.

use std::collections::VecDeque;
use std::sync::Once;

use async_trait::async_trait;
use deploy_relay::codehost::{CodeHostError, DeploymentState, StatusReport, StatusReporter};
use deploy_relay::deploy::DeploymentRequest;
use deploy_relay::http::HttpError;
use deploy_relay::target::{
    DeployTarget, DeploymentCreated, DeploymentSnapshot, SyncResult, TargetError,
};
use deploy_relay::types::{DeployHandle, RecordId, Revision};
use parking_lot::Mutex;
use serde_json::json;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("deploy_relay=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn request() -> DeploymentRequest {
    DeploymentRequest::new(
        Revision::new("0123456789abcdef0123456789abcdef01234567").unwrap(),
        "production",
        "/home/octo/repositories/site",
        "https://github.com/octo/site/actions/runs/99",
    )
}

/// Snapshot with the given timestamps object.
#[allow(dead_code)]
pub fn snapshot(timestamps: serde_json::Value) -> DeploymentSnapshot {
    serde_json::from_value(json!({"task_id": "7", "timestamps": timestamps})).unwrap()
}

#[allow(dead_code)]
pub fn created(deploy_id: u64, queued: &str) -> DeploymentCreated {
    serde_json::from_value(json!({
        "deploy_id": deploy_id,
        "task_id": "7",
        "timestamps": {"queued": queued}
    }))
    .unwrap()
}

#[allow(dead_code)]
pub fn bad_gateway(url: &str) -> HttpError {
    HttpError::Status {
        method: reqwest::Method::GET,
        url: url.to_string(),
        status: reqwest::StatusCode::BAD_GATEWAY,
        body: serde_json::Value::Null,
    }
}

/// Records every status posted to it.
#[derive(Default)]
pub struct RecordingReporter {
    records_created: Mutex<usize>,
    posted: Mutex<Vec<(RecordId, StatusReport)>>,
    fail_create: bool,
    fail_on: Option<DeploymentState>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reporter whose record creation fails with a 502.
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    /// Reporter that fails when asked to post `state`.
    pub fn failing_on(state: DeploymentState) -> Self {
        Self {
            fail_on: Some(state),
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<StatusReport> {
        self.posted.lock().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn states(&self) -> Vec<DeploymentState> {
        self.posted.lock().iter().map(|(_, r)| r.state).collect()
    }

    pub fn records(&self) -> Vec<RecordId> {
        self.posted.lock().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn records_created(&self) -> usize {
        *self.records_created.lock()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn create_deployment_record(
        &self,
        _revision: &Revision,
        _environment: &str,
    ) -> Result<RecordId, CodeHostError> {
        if self.fail_create {
            return Err(bad_gateway("https://api.github.test/repos/octo/site/deployments").into());
        }
        *self.records_created.lock() += 1;
        Ok(RecordId::new("1001"))
    }

    async fn post_status(
        &self,
        record: &RecordId,
        report: &StatusReport,
    ) -> Result<(), CodeHostError> {
        if self.fail_on == Some(report.state) {
            return Err(bad_gateway("https://api.github.test/statuses").into());
        }
        self.posted.lock().push((record.clone(), report.clone()));
        Ok(())
    }
}

/// What a scripted status poll returns.
#[allow(dead_code)]
pub enum Poll {
    Snapshot(DeploymentSnapshot),
    Transport,
    Logical,
}

/// cPanel fake driven by a script of poll responses.
///
/// Once the script runs out, the last snapshot repeats.
pub struct ScriptedTarget {
    deployable: bool,
    sync_fails: bool,
    created: DeploymentCreated,
    polls: Mutex<VecDeque<Poll>>,
    last: Mutex<Option<DeploymentSnapshot>>,
    create_calls: Mutex<usize>,
    status_calls: Mutex<Vec<DeployHandle>>,
}

#[allow(dead_code)]
impl ScriptedTarget {
    pub fn new(created: DeploymentCreated, polls: Vec<Poll>) -> Self {
        Self {
            deployable: true,
            sync_fails: false,
            created,
            polls: Mutex::new(polls.into()),
            last: Mutex::new(None),
            create_calls: Mutex::new(0),
            status_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_snapshots(created: DeploymentCreated, snapshots: Vec<DeploymentSnapshot>) -> Self {
        Self::new(created, snapshots.into_iter().map(Poll::Snapshot).collect())
    }

    pub fn not_deployable(mut self) -> Self {
        self.deployable = false;
        self
    }

    pub fn sync_fails(mut self) -> Self {
        self.sync_fails = true;
        self
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.lock().len()
    }

    pub fn polled_handles(&self) -> Vec<DeployHandle> {
        self.status_calls.lock().clone()
    }
}

#[async_trait]
impl DeployTarget for ScriptedTarget {
    async fn sync_repository(
        &self,
        _repository_root: &str,
        _branch: &str,
    ) -> Result<SyncResult, TargetError> {
        if self.sync_fails {
            return Err(TargetError::ApiLogical {
                module: "VersionControl",
                function: "update",
                errors: vec!["The repository has uncommitted changes.".to_string()],
            });
        }
        Ok(SyncResult {
            deployable: self.deployable,
        })
    }

    async fn create_deployment(
        &self,
        _repository_root: &str,
    ) -> Result<DeploymentCreated, TargetError> {
        *self.create_calls.lock() += 1;
        Ok(self.created.clone())
    }

    async fn deployment_status(
        &self,
        handle: &DeployHandle,
    ) -> Result<DeploymentSnapshot, TargetError> {
        self.status_calls.lock().push(handle.clone());
        let next = self.polls.lock().pop_front();
        match next {
            Some(Poll::Snapshot(snapshot)) => {
                *self.last.lock() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Poll::Transport) => Err(bad_gateway("https://cpanel.test/execute").into()),
            Some(Poll::Logical) => Err(TargetError::ApiLogical {
                module: "VCDeployStatus",
                function: "retrieve",
                errors: Vec::new(),
            }),
            None => Ok(self
                .last
                .lock()
                .clone()
                .unwrap_or_else(|| snapshot(json!({})))),
        }
    }
}
