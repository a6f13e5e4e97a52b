//! Scoped access to the cart.
//!
//! A [`CartProvider`] makes its store reachable through [`use_cart`] for the
//! code it runs. The scope is task-local: a task spawned from inside it does
//! not inherit the cart and must be given a [`CartContext`] explicitly.

use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::config::{CartConfig, StorageBackend};
use crate::models::{CartItem, NewCartItem, StoreError, StoreResult};
use crate::observability::StoreMetrics;
use crate::repositories::{CartRepository, StorageCartRepository};
use crate::services::CartStore;
use crate::storage::{FileStorage, InMemoryStorage, KeyValueStorage};

tokio::task_local! {
    static CURRENT_CART: CartContext;
}

/// Handle given to cart consumers
#[derive(Clone)]
pub struct CartContext {
    store: Arc<CartStore>,
}

impl CartContext {
    pub fn products(&self) -> Vec<CartItem> {
        self.store.products()
    }

    pub fn add_to_cart(&self, item: NewCartItem) -> StoreResult<()> {
        self.store.add_to_cart(item)
    }

    pub fn increment(&self, id: &str) {
        self.store.increment(id);
    }

    pub fn decrement(&self, id: &str) {
        self.store.decrement(id);
    }
}

/// Owns a cart store and runs dependents with it in scope
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    /// Build a store over `repository` and wait for the stored cart to load.
    ///
    /// This is the only way to obtain a provider, so a provider's store is
    /// always loaded and its mutations are always persisted.
    pub async fn mount(repository: Arc<dyn CartRepository>, metrics: Arc<StoreMetrics>) -> Self {
        let store = Arc::new(CartStore::new(repository, metrics));
        store.load().await;
        Self { store }
    }

    /// Mount a provider over the storage backend named in `config`
    pub async fn from_config(config: &CartConfig) -> StoreResult<Self> {
        let storage: Arc<dyn KeyValueStorage> = match config.storage.storage_backend {
            StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
            StorageBackend::File => Arc::new(FileStorage::new(&config.storage.data_dir)),
        };
        let repository = Arc::new(StorageCartRepository::with_key(
            storage,
            config.storage.storage_key.clone(),
        ));
        let metrics = Arc::new(StoreMetrics::new().map_err(|e| StoreError::Initialization {
            message: e.to_string(),
        })?);

        info!(
            backend = ?config.storage.storage_backend,
            key = %config.storage.storage_key,
            "Mounting cart provider"
        );
        Ok(Self::mount(repository, metrics).await)
    }

    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }

    /// Handle for code that runs outside this provider's scope
    pub fn context(&self) -> CartContext {
        CartContext {
            store: self.store.clone(),
        }
    }

    /// Run `future` with this cart available through [`use_cart`]
    pub async fn scope<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.context(), future).await
    }

    /// Run `f` with this cart available through [`use_cart`]
    pub fn sync_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(self.context(), f)
    }

    /// Wait for pending saves, then release the store
    pub async fn shutdown(self) {
        self.store.flush().await;
        info!("Cart provider shut down");
    }
}

/// The cart of the enclosing [`CartProvider`] scope.
///
/// Fails with [`StoreError::OutsideProvider`] when no provider scope encloses
/// the caller.
pub fn use_cart() -> StoreResult<CartContext> {
    CURRENT_CART
        .try_with(CartContext::clone)
        .map_err(|_| StoreError::OutsideProvider)
}
