pub mod config;
pub mod models;
pub mod observability;
pub mod provider;
pub mod repositories;
pub mod services;
pub mod storage;

pub use self::config::{CartConfig, ConfigError, StorageBackend};
pub use models::{CartItem, NewCartItem, StoreError, StoreResult};
pub use observability::{init_observability, StoreMetrics};
pub use provider::{use_cart, CartContext, CartProvider};
pub use services::CartStore;
