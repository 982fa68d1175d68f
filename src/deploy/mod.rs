// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, the poll loop, and cleanup registry.

mod cleanup;
mod deployment;
mod describe;
mod error;
mod poll;
mod request;
mod run;
mod state;
mod transitions;

pub use cleanup::{CleanupAction, CleanupFailure, CleanupRegistry, CleanupResult};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, Step};
pub use poll::{PollPolicy, PollStep, evaluate};
pub use request::{DEFAULT_BRANCH, DeploymentRequest};
pub use run::run;
pub use state::{Deployable, Initialized, Outcome, Pending, Queued};
