// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the identifiers that exist once it is reached.

use crate::types::{DeployHandle, RecordId, TaskId};

/// Initial state: nothing created yet.
/// Available actions: `open()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// GitHub deployment record exists and `pending` has been posted.
/// Available actions: `sync()`
#[derive(Debug, Clone)]
pub struct Pending {
    pub(crate) record: RecordId,
}

/// Server checkout updated and reported deployable.
/// Available actions: `create()`
#[derive(Debug, Clone)]
pub struct Deployable {
    pub(crate) record: RecordId,
}

/// Server deployment created and `queued` has been posted.
/// Available actions: `poll()`
#[derive(Debug, Clone)]
pub struct Queued {
    pub(crate) record: RecordId,
    pub(crate) handle: DeployHandle,
    pub(crate) task: Option<TaskId>,
}

/// How a run that reached a terminal state ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server recorded a `succeeded` timestamp.
    Success,
    /// The server recorded `failed` or `canceled`.
    Failure,
    /// The poll budget ran out with no terminal timestamp.
    Timeout,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl Pending {
    pub fn record(&self) -> &RecordId {
        &self.record
    }
}

impl Deployable {
    pub fn record(&self) -> &RecordId {
        &self.record
    }
}

impl Queued {
    pub fn record(&self) -> &RecordId {
        &self.record
    }
}
