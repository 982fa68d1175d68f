// ABOUTME: Compensating actions run when a deployment aborts before finishing.
// ABOUTME: Actions run once, in registration order, and a failing action does not stop the rest.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A deferred, zero-argument compensating operation.
pub struct CleanupAction {
    name: String,
    run: Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>,
}

impl CleanupAction {
    pub fn new<F, Fut, E>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(move || {
                action()
                    .map(|result| result.map_err(|e| Box::new(e) as BoxError))
                    .boxed()
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A cleanup action that returned an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub action: String,
    pub error: String,
}

/// Result of running the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of actions invoked, failed ones included.
    pub ran: usize,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupResult {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered set of compensating actions owned by the caller of a run.
///
/// The run registers actions as it makes progress. If it returns normally it
/// clears them; if it fails, the outermost error boundary calls
/// [`run_all_and_clear`](Self::run_all_and_clear).
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    actions: Vec<CleanupAction>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: CleanupAction) {
        tracing::debug!("Registered cleanup action: {}", action.name());
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Discard all actions without running them.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Run every action in registration order, then empty the registry.
    ///
    /// A failing action is logged and the remaining actions still run.
    pub async fn run_all_and_clear(&mut self) -> CleanupResult {
        let mut result = CleanupResult::default();

        for action in std::mem::take(&mut self.actions) {
            let CleanupAction { name, run } = action;
            tracing::info!("Running cleanup action: {}", name);
            result.ran += 1;

            if let Err(e) = run().await {
                tracing::warn!("Cleanup action '{}' failed: {}", name, e);
                result.failed.push(CleanupFailure {
                    action: name,
                    error: e.to_string(),
                });
            }
        }

        result
    }
}
