//! The cart store.
//!
//! [`CartStore`] owns the in-memory cart and keeps a persisted copy in sync.
//!
//! # Lifecycle
//!
//! The store starts in [`StoreStatus::Loading`] with an empty cart while a
//! background task reads the persisted snapshot. Once the read finishes the
//! store is [`StoreStatus::Ready`]. Mutations are allowed in both states,
//! but a snapshot that finishes loading replaces the cart wholesale, so
//! changes made while loading are lost if one was found.
//!
//! # Persistence
//!
//! Every mutation computes the next cart, swaps it in, and queues that exact
//! cart for writing. Writes happen in mutation order on the background task;
//! the mutation itself returns immediately with a [`PendingWrite`].

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use gomarketplace_core::{Cart, ItemId, NewCartItem};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

use crate::config::{CartConfig, SnapshotPolicy};
use crate::error::{CartError, Result};
use crate::persist::{
    self, Job, JobReceiver, JobSender, PendingWrite, PersistErrorHook, SnapshotWriter,
};
use crate::snapshot;
use crate::storage::KeyValueStore;

/// Load state of a [`CartStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// The persisted snapshot is still being read.
    Loading,
    /// The persisted snapshot has been read (or found missing or unreadable).
    Ready,
}

struct CartState {
    cart: Arc<Cart>,
    /// Bumped each time a loaded snapshot replaces the cart.
    epoch: u64,
    /// Number of mutations applied.
    revision: u64,
}

type SharedState = Arc<RwLock<CartState>>;

struct Inner {
    state: SharedState,
    jobs: JobSender,
    status: watch::Receiver<StoreStatus>,
    config: CartConfig,
}

/// Shopping cart state container with background persistence.
///
/// Cheap to clone; clones share the same cart. Pass it to whatever needs the
/// cart, or bind it to a task with [`CartProvider`](crate::CartProvider).
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    kv: Arc<dyn KeyValueStore>,
    config: CartConfig,
    on_persist_error: Option<PersistErrorHook>,
}

impl CartStoreBuilder {
    /// Use `config` instead of [`CartConfig::default`].
    #[must_use]
    pub fn config(mut self, config: CartConfig) -> Self {
        self.config = config;
        self
    }

    /// Call `hook` whenever a snapshot write fails.
    #[must_use]
    pub fn on_persist_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CartError) + Send + Sync + 'static,
    {
        self.on_persist_error = Some(Arc::new(hook));
        self
    }

    /// Create the store and start loading the persisted snapshot.
    ///
    /// Returns immediately; the store is [`StoreStatus::Loading`] until the
    /// load finishes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn open(self) -> CartStore {
        let state = Arc::new(RwLock::new(CartState {
            cart: Arc::new(Cart::new()),
            epoch: 0,
            revision: 0,
        }));
        let (jobs, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(StoreStatus::Loading);

        let writer = SnapshotWriter::new(
            self.kv,
            self.config.storage_key.clone(),
            self.on_persist_error,
        );

        info!(key = %self.config.storage_key, "Spawning cart load task");
        tokio::spawn(run(writer, Arc::clone(&state), status_tx, rx));

        CartStore {
            inner: Arc::new(Inner {
                state,
                jobs,
                status: status_rx,
                config: self.config,
            }),
        }
    }
}

impl CartStore {
    /// Start building a store over `kv`.
    #[must_use]
    pub fn builder(kv: impl KeyValueStore + 'static) -> CartStoreBuilder {
        CartStoreBuilder {
            kv: Arc::new(kv),
            config: CartConfig::default(),
            on_persist_error: None,
        }
    }

    /// Create a store and start loading in the background.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn open(kv: impl KeyValueStore + 'static, config: CartConfig) -> Self {
        Self::builder(kv).config(config).open()
    }

    /// Create a store and wait for the persisted snapshot to load.
    ///
    /// # Errors
    ///
    /// Returns `CartError::WriterStopped` if the load task died.
    pub async fn load(kv: impl KeyValueStore + 'static, config: CartConfig) -> Result<Self> {
        let store = Self::open(kv, config);
        store.ready().await?;
        Ok(store)
    }

    /// Current load state.
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        *self.inner.status.borrow()
    }

    /// Wait until the persisted snapshot has been read.
    ///
    /// # Errors
    ///
    /// Returns `CartError::WriterStopped` if the load task died first.
    pub async fn ready(&self) -> Result<()> {
        let mut status = self.inner.status.clone();
        status
            .wait_for(|s| *s == StoreStatus::Ready)
            .await
            .map(|_| ())
            .map_err(|_| CartError::WriterStopped)
    }

    /// The store configuration.
    #[must_use]
    pub fn config(&self) -> &CartConfig {
        &self.inner.config
    }

    /// Read-only snapshot of the current cart, in insertion order.
    #[must_use]
    pub fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.read_state().cart)
    }

    /// Add one unit of `candidate` to the cart.
    ///
    /// Increments the existing line if the id is already present, otherwise
    /// appends the candidate with quantity 1.
    #[instrument(skip_all, fields(id = %candidate.id))]
    pub fn add_to_cart(&self, candidate: NewCartItem) -> PendingWrite {
        let legacy = self.inner.config.snapshot_policy == SnapshotPolicy::PreMutationOnAdd;
        self.mutate(legacy, |cart| {
            let quantity = cart.add(candidate);
            debug!(quantity, "Added to cart");
        })
    }

    /// Increase the quantity of the item with `id` by one.
    ///
    /// Unknown ids leave the cart unchanged.
    #[instrument(skip_all, fields(id = %id))]
    pub fn increment(&self, id: &ItemId) -> PendingWrite {
        self.mutate(false, |cart| {
            if !cart.increment(id) {
                debug!("No cart item to increment");
            }
        })
    }

    /// Decrease the quantity of the item with `id` by one.
    ///
    /// Quantities are not floored at zero. Unknown ids leave the cart
    /// unchanged.
    #[instrument(skip_all, fields(id = %id))]
    pub fn decrement(&self, id: &ItemId) -> PendingWrite {
        self.mutate(false, |cart| {
            if !cart.decrement(id) {
                debug!("No cart item to decrement");
            }
        })
    }

    /// Remove every item from the cart.
    #[instrument(skip(self))]
    pub fn clear(&self) -> PendingWrite {
        self.mutate(false, Cart::clear)
    }

    /// Wait until every write queued so far has been attempted.
    ///
    /// # Errors
    ///
    /// Returns `CartError::WriterStopped` if the writer shut down first.
    pub async fn flush(&self) -> Result<()> {
        let (done, rx) = oneshot::channel();
        self.inner
            .jobs
            .send(Job::Flush { done })
            .map_err(|_| CartError::WriterStopped)?;
        rx.await.map_err(|_| CartError::WriterStopped)
    }

    /// Apply `f` to a copy of the cart, swap the result in, and queue a write.
    ///
    /// The write is queued while the lock is held so queue order matches
    /// mutation order. With `persist_previous` the cart from before `f` is
    /// queued instead of the new one.
    fn mutate(&self, persist_previous: bool, f: impl FnOnce(&mut Cart)) -> PendingWrite {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = Arc::clone(&state.cart);
        let mut next = Cart::clone(&previous);
        f(&mut next);

        let next = Arc::new(next);
        state.cart = Arc::clone(&next);
        state.revision += 1;

        let snapshot = if persist_previous { previous } else { next };
        persist::enqueue(&self.inner.jobs, snapshot, state.epoch)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CartState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("CartStore")
            .field("status", &self.status())
            .field("items", &state.cart.len())
            .field("revision", &state.revision)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Background task: load the snapshot, then persist queued writes.
async fn run(
    writer: SnapshotWriter,
    state: SharedState,
    status: watch::Sender<StoreStatus>,
    mut jobs: JobReceiver,
) {
    let epoch = match load_snapshot(&writer).await {
        Some(loaded) => apply_loaded(&state, loaded),
        None => 0,
    };

    // Receivers may all be gone already; the store still works without them
    let _ = status.send(StoreStatus::Ready);

    writer.drain(&mut jobs, epoch).await;
}

/// Read and decode the persisted snapshot.
///
/// Missing, unreadable and malformed snapshots all yield `None`.
#[instrument(skip_all, fields(key = %writer.key()))]
async fn load_snapshot(writer: &SnapshotWriter) -> Option<Cart> {
    let raw = match writer.kv().get(writer.key()).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("No persisted cart, starting empty");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return None;
        }
    };

    match snapshot::decode(&raw) {
        Ok(cart) => {
            info!(items = cart.len(), "Loaded persisted cart");
            Some(cart)
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting empty");
            None
        }
    }
}

/// Replace the cart with `loaded` and return the new epoch.
fn apply_loaded(state: &SharedState, loaded: Cart) -> u64 {
    let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
    if state.revision > 0 {
        warn!(
            discarded = state.revision,
            "Cart changed while loading; loaded snapshot replaces those changes"
        );
    }
    state.cart = Arc::new(loaded);
    state.epoch += 1;
    state.epoch
}
