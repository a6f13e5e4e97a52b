use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, OnceCell};
use tracing::{debug, info, instrument, warn};

use super::persister::{spawn_persister, Snapshot};
use crate::models::{Cart, CartItem, CartOperation, NewCartItem, StoreResult, Validate};
use crate::observability::{OperationOutcome, StoreMetrics};
use crate::repositories::CartRepository;

/// Owner of the in-memory cart and its persistence.
///
/// Mutations apply immediately and return; saving happens on a background
/// task. Storage is never written before [`CartStore::load`] completes.
/// Mutations issued before that are kept and replayed onto the restored cart.
pub struct CartStore {
    state: RwLock<StoreState>,
    repository: Arc<dyn CartRepository>,
    metrics: Arc<StoreMetrics>,
    snapshots: watch::Sender<Snapshot>,
    settled: watch::Receiver<u64>,
    initial_load: OnceCell<()>,
}

#[derive(Default)]
struct StoreState {
    cart: Cart,
    loaded: bool,
    pending: Vec<CartOperation>,
    version: u64,
}

impl CartStore {
    /// Create an unloaded store and start its persister.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(repository: Arc<dyn CartRepository>, metrics: Arc<StoreMetrics>) -> Self {
        let (snapshots, snapshot_rx) = watch::channel(Snapshot::default());
        let (settled_tx, settled) = watch::channel(0);

        spawn_persister(repository.clone(), metrics.clone(), snapshot_rx, settled_tx);

        Self {
            state: RwLock::new(StoreState::default()),
            repository,
            metrics,
            snapshots,
            settled,
            initial_load: OnceCell::new(),
        }
    }

    /// Restore the persisted cart, returning the resulting snapshot.
    ///
    /// The repository is read at most once; later or concurrent calls wait for
    /// that read and return the current snapshot. A failed read is logged and
    /// treated as an empty cart.
    pub async fn load(&self) -> Vec<CartItem> {
        self.initial_load.get_or_init(|| self.restore()).await;
        self.products()
    }

    #[instrument(skip(self))]
    async fn restore(&self) {
        let started = Instant::now();
        let restored = match self.repository.load_products().await {
            Ok(items) => {
                self.metrics
                    .record_storage_operation("load", true, started.elapsed().as_secs_f64());
                items
            }
            Err(e) => {
                self.metrics
                    .record_storage_operation("load", false, started.elapsed().as_secs_f64());
                warn!("Failed to load stored cart, starting empty: {}", e);
                Vec::new()
            }
        };

        let mut state = self.state.write();
        let mut cart = Cart::from_items(restored);
        let pending = std::mem::take(&mut state.pending);
        let replayed = pending
            .iter()
            .filter(|operation| cart.apply(operation))
            .count();

        state.cart = cart;
        state.loaded = true;
        self.metrics.set_line_items(state.cart.len());

        // Only a replay makes memory differ from storage
        if replayed > 0 {
            self.publish(&mut state);
        }

        info!(
            items = state.cart.len(),
            queued = pending.len(),
            replayed,
            "Cart loaded"
        );
    }

    /// Add a product, or increment it when its id is already in the cart
    pub fn add_to_cart(&self, item: NewCartItem) -> StoreResult<()> {
        if let Err(e) = item.validate() {
            self.metrics
                .record_cart_operation("add_to_cart", OperationOutcome::Rejected);
            warn!(item_id = %item.id, "Rejected cart item: {}", e);
            return Err(e.into());
        }

        self.mutate(CartOperation::Add(item));
        Ok(())
    }

    /// Increase an item's quantity by one; unknown ids are ignored
    pub fn increment(&self, id: &str) {
        self.mutate(CartOperation::Increment(id.to_string()));
    }

    /// Decrease an item's quantity by one, never below 1; unknown ids are ignored
    pub fn decrement(&self, id: &str) {
        self.mutate(CartOperation::Decrement(id.to_string()));
    }

    /// Current ordered snapshot of the cart
    pub fn products(&self) -> Vec<CartItem> {
        self.state.read().cart.items().to_vec()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    pub fn metrics(&self) -> &Arc<StoreMetrics> {
        &self.metrics
    }

    /// Wait until every snapshot published so far has been handed to storage
    pub async fn flush(&self) {
        let published = self.state.read().version;
        let mut settled = self.settled.clone();
        if settled.wait_for(|version| *version >= published).await.is_err() {
            warn!(published, "Cart persister stopped before flushing");
        }
    }

    fn mutate(&self, operation: CartOperation) {
        let name = operation.name();
        let mut state = self.state.write();
        let changed = state.cart.apply(&operation);

        let outcome = if !state.loaded {
            debug!(operation = name, item_id = %operation.item_id(), "Queued until cart is loaded");
            state.pending.push(operation);
            OperationOutcome::Queued
        } else if changed {
            self.publish(&mut state);
            OperationOutcome::Applied
        } else {
            debug!(operation = name, item_id = %operation.item_id(), "Cart unchanged");
            OperationOutcome::Noop
        };

        self.metrics.set_line_items(state.cart.len());
        drop(state);

        self.metrics.record_cart_operation(name, outcome);
    }

    /// Hand the current cart to the persister. Called with the write lock held
    /// so snapshot order always matches version order.
    fn publish(&self, state: &mut StoreState) {
        state.version += 1;
        self.snapshots.send_replace(Snapshot {
            version: state.version,
            items: Arc::new(state.cart.items().to_vec()),
        });
    }
}
