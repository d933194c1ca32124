//! Ordered background persistence of cart snapshots.
//!
//! Mutations enqueue the snapshot they produced while still holding the cart
//! lock, so the queue order is the mutation order. A single writer task
//! drains the queue, which means the last value written is always the last
//! cart the store held.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use gomarketplace_core::Cart;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{CartError, Result};
use crate::snapshot;
use crate::storage::KeyValueStore;

/// Callback invoked when a snapshot write fails.
pub type PersistErrorHook = Arc<dyn Fn(&CartError) + Send + Sync>;

/// What happened to a queued snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The snapshot was written to storage.
    Persisted,
    /// The snapshot was dropped because the persisted cart finished loading
    /// after the mutation and replaced it.
    Superseded,
}

/// Handle to a snapshot write queued by a cart mutation.
///
/// The write happens whether or not this handle is awaited. Await it (or call
/// [`wait`](Self::wait)) to learn the outcome; drop it for fire-and-forget.
pub struct PendingWrite {
    rx: oneshot::Receiver<Result<WriteOutcome>>,
}

impl PendingWrite {
    pub(crate) const fn new(rx: oneshot::Receiver<Result<WriteOutcome>>) -> Self {
        Self { rx }
    }

    /// Wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns the storage or encoding error that failed the write, or
    /// `CartError::WriterStopped` if the writer shut down first.
    pub async fn wait(self) -> Result<WriteOutcome> {
        self.await
    }
}

impl Future for PendingWrite {
    type Output = Result<WriteOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(CartError::WriterStopped)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWrite").finish_non_exhaustive()
    }
}

/// Work item for the writer task.
pub(crate) enum Job {
    /// Persist `snapshot`. `epoch` is the load epoch the mutation saw.
    Write {
        snapshot: Arc<Cart>,
        epoch: u64,
        done: oneshot::Sender<Result<WriteOutcome>>,
    },
    /// Reply once every job queued before this one has been handled.
    Flush { done: oneshot::Sender<()> },
}

pub(crate) type JobSender = mpsc::UnboundedSender<Job>;
pub(crate) type JobReceiver = mpsc::UnboundedReceiver<Job>;

/// Queue a write and return its handle.
///
/// If the writer is gone the returned handle resolves to
/// `CartError::WriterStopped`.
pub(crate) fn enqueue(jobs: &JobSender, snapshot: Arc<Cart>, epoch: u64) -> PendingWrite {
    let (done, rx) = oneshot::channel();
    // A closed channel drops `done`, which the handle reports as WriterStopped
    let _ = jobs.send(Job::Write {
        snapshot,
        epoch,
        done,
    });
    PendingWrite::new(rx)
}

/// Writes snapshots to one key of a key-value store.
pub(crate) struct SnapshotWriter {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    on_error: Option<PersistErrorHook>,
}

impl SnapshotWriter {
    pub(crate) const fn new(
        kv: Arc<dyn KeyValueStore>,
        key: String,
        on_error: Option<PersistErrorHook>,
    ) -> Self {
        Self { kv, key, on_error }
    }

    pub(crate) fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Drain the queue until every sender is gone.
    ///
    /// Writes stamped with an epoch older than `epoch` are dropped as
    /// [`WriteOutcome::Superseded`].
    pub(crate) async fn drain(&self, jobs: &mut JobReceiver, epoch: u64) {
        while let Some(job) = jobs.recv().await {
            match job {
                Job::Write {
                    snapshot,
                    epoch: job_epoch,
                    done,
                } => {
                    let outcome = if job_epoch < epoch {
                        debug!(items = snapshot.len(), "Dropping write superseded by load");
                        Ok(WriteOutcome::Superseded)
                    } else {
                        self.write(&snapshot).await.map(|()| WriteOutcome::Persisted)
                    };
                    // Nobody waiting is fine
                    let _ = done.send(outcome);
                }
                Job::Flush { done } => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Cart writer stopped");
    }

    async fn write(&self, cart: &Cart) -> Result<()> {
        let result = match snapshot::encode(cart) {
            Ok(raw) => self
                .kv
                .set(&self.key, &raw)
                .await
                .map_err(CartError::from),
            Err(e) => Err(CartError::from(e)),
        };

        match &result {
            Ok(()) => debug!(key = %self.key, items = cart.len(), "Persisted cart snapshot"),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist cart snapshot");
                if let Some(hook) = &self.on_error {
                    hook(e);
                }
            }
        }

        result
    }
}
