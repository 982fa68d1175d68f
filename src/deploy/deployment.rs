// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own identifiers for compile-time guarantees.

use super::request::DeploymentRequest;
use super::state::{Deployable, Initialized, Pending, Queued};
use crate::types::RecordId;

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries the identifiers created so far
/// (GitHub record, cPanel deploy handle). A status can only be posted once a
/// record exists, and polling is only possible once a handle exists; both
/// are enforced by which methods each `Deployment<S>` offers.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(request: DeploymentRequest) -> Self {
        Deployment {
            request,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }
}

// State-specific accessor for the GitHub record
impl Deployment<Pending> {
    pub fn record(&self) -> &RecordId {
        self.state.record()
    }
}

impl Deployment<Deployable> {
    pub fn record(&self) -> &RecordId {
        self.state.record()
    }
}

impl Deployment<Queued> {
    pub fn record(&self) -> &RecordId {
        self.state.record()
    }
}
