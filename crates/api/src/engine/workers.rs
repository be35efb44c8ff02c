//! Bounded worker pool for background lifecycle units.
//!
//! Ids are queued on an unbounded channel and a single dispatcher task
//! starts one unit per id, holding a semaphore permit for the unit's whole
//! run so at most `max_concurrent` units execute at once. Every id is
//! dispatched exactly once; nothing is ever re-queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use refactorer_core::types::RecordId;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// The pool no longer accepts work because shutdown has begun.
#[derive(Debug, thiserror::Error)]
#[error("lifecycle worker pool is shut down; refactoring {0} was not scheduled")]
pub struct QueueClosed(pub RecordId);

pub struct WorkerPool {
    sender: mpsc::UnboundedSender<RecordId>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl WorkerPool {
    /// Spawn the dispatcher. `handler` runs once per enqueued id.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(max_concurrent: usize, handler: F) -> Self
    where
        F: Fn(RecordId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();
        let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));

        tracker.spawn(dispatch(
            receiver,
            permits,
            tracker.clone(),
            cancel.clone(),
            Arc::new(handler),
        ));
        tracing::info!(max_concurrent, "Lifecycle worker pool started");

        Self {
            sender,
            cancel,
            tracker,
        }
    }

    /// Queue one background unit for `id`.
    pub fn enqueue(&self, id: RecordId) -> Result<(), QueueClosed> {
        if self.cancel.is_cancelled() {
            return Err(QueueClosed(id));
        }
        self.sender.send(id).map_err(|e| QueueClosed(e.0))
    }

    /// Stop taking new ids and wait up to `timeout` for running units.
    ///
    /// Ids still queued when shutdown begins are not started; their records
    /// stay `processing`. Returns `false` if the timeout elapsed first.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel.cancel();
        self.tracker.close();

        match tokio::time::timeout(timeout, self.tracker.wait()).await {
            Ok(()) => {
                tracing::info!("Lifecycle worker pool drained");
                true
            }
            Err(_) => {
                tracing::warn!(
                    still_running = self.tracker.len(),
                    timeout_secs = timeout.as_secs(),
                    "Lifecycle worker pool did not drain before timeout",
                );
                false
            }
        }
    }
}

async fn dispatch<F, Fut>(
    mut receiver: mpsc::UnboundedReceiver<RecordId>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    handler: Arc<F>,
) where
    F: Fn(RecordId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    loop {
        let id = tokio::select! {
            _ = cancel.cancelled() => break,
            next = receiver.recv() => match next {
                Some(id) => id,
                None => break,
            },
        };

        let permit = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!(
                    refactoring_id = %id,
                    "Shutdown before unit started; record left processing",
                );
                break;
            }
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        tracing::debug!(refactoring_id = %id, "Worker picked up refactoring");
        let unit = (*handler)(id);
        tracker.spawn(async move {
            let _permit = permit;
            unit.await;
        });
    }

    receiver.close();
    let mut abandoned = 0usize;
    while receiver.try_recv().is_ok() {
        abandoned += 1;
    }
    if abandoned > 0 {
        tracing::warn!(abandoned, "Queued refactorings not started before shutdown");
    }
    tracing::info!("Lifecycle dispatcher stopped");
}
