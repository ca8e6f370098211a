//! Shutdown coordinator for background cache tasks
//!
//! Uses tokio-util primitives:
//! - `CancellationToken` to signal the expiry sweep and metrics flush loops
//! - `TaskTracker` to await them during shutdown
//!
//! ```rust,ignore
//! let coordinator = ShutdownCoordinator::new();
//! coordinator.spawn_cancellable("sweep", |token| async move { /* ... */ });
//! let completed = coordinator.shutdown(Duration::from_secs(5)).await;
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Shutdown coordinator for background tasks
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Child token, cancelled together with the coordinator
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Check if shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Get the number of active tracked tasks
    pub fn active_tasks(&self) -> usize {
        self.task_tracker.len()
    }

    /// Spawn and track a background task
    pub fn spawn<F>(&self, name: &'static str, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        debug!(task = name, "Spawning tracked task");
        self.task_tracker.spawn(future)
    }

    /// Spawn a task that receives a child cancellation token
    pub fn spawn_cancellable<F, Fut>(
        &self,
        name: &'static str,
        task_fn: F,
    ) -> JoinHandle<Fut::Output>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let token = self.child_token();
        self.spawn(name, task_fn(token))
    }

    /// Cancel every task, close the tracker and wait up to `timeout`
    ///
    /// Returns `true` if all tasks completed before the timeout.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        info!(
            active_tasks = self.task_tracker.len(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "Stopping background tasks"
        );

        self.cancel_token.cancel();
        self.task_tracker.close();

        tokio::select! {
            () = self.task_tracker.wait() => {
                debug!("All background tasks completed");
                true
            }
            () = tokio::time::sleep(timeout) => {
                warn!(
                    active_tasks = self.task_tracker.len(),
                    "Timeout reached with tasks still active"
                );
                false
            }
        }
    }
}
