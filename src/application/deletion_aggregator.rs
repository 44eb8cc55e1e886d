//! Batched, asynchronous soft-deletion of user links.
//!
//! Request handlers hand over small [`DeleteTask`]s and return immediately. A
//! single aggregation loop merges the tasks per owner and flushes them to a
//! fixed pool of delete workers when either the pending code count reaches
//! the batch size or the flush interval elapses.
//!
//! ```text
//! add_task ──► intake (bounded) ──► aggregation loop ──► worker queue ──► delete workers ──► LinkRepository::delete_batch
//! ```
//!
//! Delivery to storage is at-most-once: a failed or timed-out batch is logged
//! and dropped, never requeued.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::application::lifecycle::Lifecycle;
use crate::domain::delete_task::DeleteTask;
use crate::domain::repositories::LinkRepository;
use crate::error::PipelineError;

/// Tuning knobs for the deletion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionConfig {
    /// Number of delete workers.
    pub workers: usize,
    /// Pending code count that triggers an immediate flush.
    pub batch_size: usize,
    /// Period of the time-based flush.
    pub flush_interval: Duration,
    /// Capacity of the intake queue in front of the aggregation loop.
    pub intake_capacity: usize,
    /// Upper bound for a single `delete_batch` call.
    pub delete_timeout: Duration,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            batch_size: 50,
            flush_interval: Duration::from_secs(5),
            intake_capacity: 100,
            delete_timeout: Duration::from_secs(5),
        }
    }
}

impl DeletionConfig {
    /// Capacity of the queue between the aggregation loop and the workers.
    pub fn worker_queue_capacity(&self) -> usize {
        self.workers.max(1) * 3
    }
}

/// Front door of the deletion pipeline.
///
/// Shared between request handlers behind an `Arc`. Must be started inside a
/// Tokio runtime.
pub struct DeletionAggregator {
    intake: mpsc::Sender<DeleteTask>,
    lifecycle: Lifecycle,
}

impl DeletionAggregator {
    /// Spawns the aggregation loop and the worker pool.
    pub fn start(repository: Arc<dyn LinkRepository>, config: DeletionConfig) -> Self {
        let workers = config.workers.max(1);
        let (intake, intake_rx) = mpsc::channel(config.intake_capacity.max(1));
        let (batches, batches_rx) = mpsc::channel(config.worker_queue_capacity());
        let lifecycle = Lifecycle::new();

        lifecycle.spawn(aggregate(
            intake_rx,
            batches,
            config.batch_size.max(1),
            config.flush_interval,
            lifecycle.token(),
        ));

        let batches_rx = Arc::new(Mutex::new(batches_rx));
        for id in 0..workers {
            lifecycle.spawn(delete_worker(
                id,
                batches_rx.clone(),
                repository.clone(),
                config.delete_timeout,
            ));
        }

        info!(
            workers,
            batch_size = config.batch_size,
            flush_interval = ?config.flush_interval,
            "Deletion aggregator started"
        );

        Self { intake, lifecycle }
    }

    /// Queues `codes` of `owner_id` for deletion.
    ///
    /// Waits only while the intake queue is full. An empty `codes` list is
    /// accepted and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::WorkerStopped`] once [`Self::stop`] has been called.
    pub async fn add_task(&self, owner_id: i64, codes: Vec<String>) -> Result<(), PipelineError> {
        if self.lifecycle.is_stopped() {
            return Err(PipelineError::WorkerStopped);
        }
        if codes.is_empty() {
            return Ok(());
        }

        self.intake
            .send(DeleteTask::new(owner_id, codes))
            .await
            .map_err(|_| PipelineError::WorkerStopped)
    }

    pub fn is_stopped(&self) -> bool {
        self.lifecycle.is_stopped()
    }

    /// Free slots in the intake queue.
    pub fn available_capacity(&self) -> usize {
        self.intake.capacity()
    }

    /// Drains the pipeline and waits for every worker to finish.
    ///
    /// Every task accepted by [`Self::add_task`] before this call is handed to
    /// a worker exactly once. Later calls return immediately.
    pub async fn stop(&self) {
        let initiated = self.lifecycle.signal();
        if initiated {
            info!("Stopping deletion aggregator");
        }

        self.lifecycle.wait().await;

        if initiated {
            info!("Deletion aggregator stopped");
        }
    }
}

/// Codes waiting for the next flush, merged per owner.
#[derive(Debug, Default)]
struct PendingBatch {
    owners: HashMap<i64, OwnerCodes>,
    len: usize,
}

#[derive(Debug, Default)]
struct OwnerCodes {
    codes: Vec<String>,
    seen: HashSet<String>,
}

impl PendingBatch {
    /// Appends the task's codes to its owner, skipping codes already pending.
    fn push(&mut self, task: DeleteTask) {
        if task.is_empty() {
            return;
        }

        let owner = self.owners.entry(task.owner_id).or_default();
        for code in task.codes {
            if owner.seen.insert(code.clone()) {
                owner.codes.push(code);
                self.len += 1;
            }
        }
    }

    /// Distinct codes pending across all owners.
    fn len(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Empties the batch, yielding one task per owner with pending codes.
    fn take(&mut self) -> Vec<DeleteTask> {
        self.len = 0;
        std::mem::take(&mut self.owners)
            .into_iter()
            .filter(|(_, owner)| !owner.codes.is_empty())
            .map(|(owner_id, owner)| DeleteTask::new(owner_id, owner.codes))
            .collect()
    }
}

async fn aggregate(
    mut intake: mpsc::Receiver<DeleteTask>,
    batches: mpsc::Sender<DeleteTask>,
    batch_size: usize,
    flush_interval: Duration,
    shutdown: CancellationToken,
) {
    let mut pending = PendingBatch::default();
    let mut ticker = tokio::time::interval_at(Instant::now() + flush_interval, flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if !pending.is_empty() {
                    debug!(pending = pending.len(), "Flush interval elapsed");
                    flush(&mut pending, &batches).await;
                }
            }
            task = intake.recv() => match task {
                Some(task) => {
                    pending.push(task);
                    if pending.len() >= batch_size {
                        debug!(pending = pending.len(), "Batch size reached");
                        flush(&mut pending, &batches).await;
                    }
                }
                None => break,
            },
        }
    }

    // Refuse new tasks, then fold in whatever was accepted before the close.
    intake.close();
    while let Some(task) = intake.recv().await {
        pending.push(task);
    }
    flush(&mut pending, &batches).await;

    debug!("Aggregation loop stopped");
}

async fn flush(pending: &mut PendingBatch, batches: &mpsc::Sender<DeleteTask>) {
    for task in pending.take() {
        if let Err(mpsc::error::SendError(task)) = batches.send(task).await {
            error!(
                owner_id = task.owner_id,
                codes = ?task.codes,
                "Delete workers are gone, batch dropped"
            );
        }
    }
}

async fn delete_worker(
    id: usize,
    batches: Arc<Mutex<mpsc::Receiver<DeleteTask>>>,
    repository: Arc<dyn LinkRepository>,
    timeout: Duration,
) {
    debug!(worker = id, "Delete worker started");

    loop {
        let next = batches.lock().await.recv().await;
        let Some(batch) = next else {
            break;
        };
        delete_batch(id, repository.as_ref(), batch, timeout).await;
    }

    debug!(worker = id, "Delete worker stopped");
}

async fn delete_batch(
    worker: usize,
    repository: &dyn LinkRepository,
    batch: DeleteTask,
    timeout: Duration,
) {
    let DeleteTask { owner_id, codes } = batch;

    match tokio::time::timeout(timeout, repository.delete_batch(owner_id, codes.clone())).await {
        Ok(Ok(())) => debug!(worker, owner_id, count = codes.len(), "Batch deleted"),
        Ok(Err(e)) => error!(
            worker,
            owner_id,
            codes = ?codes,
            error = %e,
            "Batch delete failed, batch dropped"
        ),
        Err(_) => error!(
            worker,
            owner_id,
            codes = ?codes,
            timeout = ?timeout,
            "Batch delete timed out, batch dropped"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(owner_id: i64, codes: &[&str]) -> DeleteTask {
        DeleteTask::new(owner_id, codes.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_pending_merges_same_owner_in_arrival_order() {
        let mut pending = PendingBatch::default();
        pending.push(task(7, &["a"]));
        pending.push(task(7, &["b", "c"]));

        assert_eq!(pending.len(), 3);
        assert_eq!(pending.take(), vec![task(7, &["a", "b", "c"])]);
    }

    #[test]
    fn test_pending_skips_duplicate_codes() {
        let mut pending = PendingBatch::default();
        pending.push(task(1, &["x", "y"]));
        pending.push(task(1, &["y", "z"]));

        assert_eq!(pending.len(), 3);
        assert_eq!(pending.take(), vec![task(1, &["x", "y", "z"])]);
    }

    #[test]
    fn test_pending_keeps_owners_apart() {
        let mut pending = PendingBatch::default();
        pending.push(task(1, &["a"]));
        pending.push(task(2, &["a"]));

        let mut flushed = pending.take();
        flushed.sort_by_key(|t| t.owner_id);

        assert_eq!(flushed, vec![task(1, &["a"]), task(2, &["a"])]);
    }

    #[test]
    fn test_take_resets_state() {
        let mut pending = PendingBatch::default();
        pending.push(task(3, &["a"]));
        pending.take();

        assert!(pending.is_empty());
        assert!(pending.take().is_empty());

        pending.push(task(3, &["a"]));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_empty_task_is_ignored() {
        let mut pending = PendingBatch::default();
        pending.push(task(9, &[]));

        assert!(pending.is_empty());
        assert!(pending.take().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = DeletionConfig::default();

        assert_eq!(config.workers, 3);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.flush_interval, Duration::from_secs(5));
        assert_eq!(config.intake_capacity, 100);
        assert_eq!(config.worker_queue_capacity(), 9);
    }
}
