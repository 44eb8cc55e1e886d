//! Shutdown bookkeeping shared by the background pipelines.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Owns the stop signal and every task spawned by one pipeline.
///
/// Loops observe [`Lifecycle::token`] and drain their queues once it fires;
/// [`Lifecycle::stop`] then waits until all of them have returned.
#[derive(Debug, Default)]
pub struct Lifecycle {
    shutdown: CancellationToken,
    tasks: TaskTracker,
    stopping: AtomicBool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a pipeline loop on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Signal observed by the pipeline loops.
    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Signals shutdown without waiting.
    ///
    /// Returns `true` only for the call that moved the lifecycle into the
    /// stopping state.
    pub fn signal(&self) -> bool {
        let first = !self.stopping.swap(true, Ordering::SeqCst);
        self.shutdown.cancel();
        self.tasks.close();
        first
    }

    /// Waits for every spawned loop to finish.
    pub async fn wait(&self) {
        self.tasks.wait().await;
    }

    /// Signals shutdown and waits for every spawned loop to finish.
    ///
    /// Calling it again after the first call has completed returns immediately.
    /// Returns `true` for the call that initiated the shutdown.
    pub async fn stop(&self) -> bool {
        let first = self.signal();
        self.wait().await;
        first
    }
}
