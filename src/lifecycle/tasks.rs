//! Detached background work started by request handlers.
//!
//! Handlers hand work to `BackgroundTasks::spawn` and return immediately.
//! The set is owned by the server, so shutdown can wait for the work with a
//! deadline and abort whatever is still running afterwards.

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};

#[derive(Clone, Default)]
pub struct BackgroundTasks {
    inner: Arc<Mutex<JoinSet<()>>>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `task` detached. Its error, or a panic, is logged under `name`.
    pub fn spawn<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display,
    {
        let mut set = self.lock();
        while let Some(finished) = set.try_join_next() {
            log_join_error(finished);
        }

        tracing::debug!(task = name, "Spawning background task");
        set.spawn(async move {
            match task.await {
                Ok(()) => tracing::info!(task = name, "Background task finished"),
                Err(e) => tracing::error!(task = name, error = %e, "Background task failed"),
            }
        });
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait up to `grace` for running tasks, then abort the rest.
    /// Returns how many tasks were aborted.
    pub async fn drain(&self, grace: Duration) -> usize {
        let mut set = std::mem::take(&mut *self.lock());
        if set.is_empty() {
            return 0;
        }

        tracing::info!(tasks = set.len(), grace = ?grace, "Waiting for background tasks");
        let finished = tokio::time::timeout(grace, async {
            while let Some(result) = set.join_next().await {
                log_join_error(result);
            }
        })
        .await;

        if finished.is_ok() {
            return 0;
        }

        let aborted = set.len();
        set.shutdown().await;
        tracing::warn!(aborted, "Aborted background tasks after grace period");
        aborted
    }
}

fn log_join_error(result: Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!(error = %e, "Background task panicked");
        }
    }
}
