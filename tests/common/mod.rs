#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use gomarketplace_cart::repositories::StorageCartRepository;
use gomarketplace_cart::storage::{FileStorage, InMemoryStorage, KeyValueStorage};
use gomarketplace_cart::{CartItem, CartProvider, NewCartItem, StoreMetrics};

pub fn product(id: &str) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {}", id),
        format!("https://cdn.example.com/{}.png", id),
        12.5,
    )
}

pub fn quantities(items: &[CartItem]) -> Vec<(String, u32)> {
    items
        .iter()
        .map(|item| (item.id.clone(), item.quantity))
        .collect()
}

pub async fn provider_over(storage: Arc<dyn KeyValueStorage>) -> CartProvider {
    let repository = Arc::new(StorageCartRepository::new(storage));
    let metrics = Arc::new(StoreMetrics::new().expect("metrics registry"));
    CartProvider::mount(repository, metrics).await
}

pub async fn file_provider(dir: &Path) -> CartProvider {
    provider_over(Arc::new(FileStorage::new(dir))).await
}

pub async fn memory_provider() -> (Arc<InMemoryStorage>, CartProvider) {
    let storage = Arc::new(InMemoryStorage::new());
    let provider = provider_over(storage.clone()).await;
    (storage, provider)
}
