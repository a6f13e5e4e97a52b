use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::models::{Cart, CartItem, RepositoryResult, Validate};
use crate::storage::KeyValueStorage;

/// Storage key the cart has always been persisted under
pub const DEFAULT_CART_STORAGE_KEY: &str = "@GoMarketplace:products";

/// Trait defining the interface for persisting the cart
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Restore the persisted cart. A missing entry is an empty cart.
    async fn load_products(&self) -> RepositoryResult<Vec<CartItem>>;

    /// Overwrite the persisted cart with `products`
    async fn save_products(&self, products: &[CartItem]) -> RepositoryResult<()>;
}

/// Key-value implementation of the CartRepository trait.
///
/// The whole cart lives under a single key as a JSON array of items.
pub struct StorageCartRepository {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl StorageCartRepository {
    /// Create a repository over `storage` using the default key
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, DEFAULT_CART_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decode a stored cart, keeping only well-formed entries.
    ///
    /// Unparseable JSON or a non-array value yields an empty cart.
    pub fn decode_products(&self, raw: &str) -> Vec<CartItem> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.key, "Stored cart is not valid JSON, starting empty: {}", e);
                return Vec::new();
            }
        };

        let entries = match value {
            Value::Array(entries) => entries,
            Value::Null => return Vec::new(),
            other => {
                warn!(
                    key = %self.key,
                    "Stored cart is not an array (found {}), starting empty",
                    json_type_name(&other)
                );
                return Vec::new();
            }
        };

        let total = entries.len();
        let items: Vec<CartItem> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let item = match serde_json::from_value::<CartItem>(entry) {
                    Ok(item) => item,
                    Err(e) => {
                        warn!(key = %self.key, index, "Skipping malformed cart entry: {}", e);
                        return None;
                    }
                };
                match item.validate() {
                    Ok(()) => Some(item),
                    Err(e) => {
                        warn!(key = %self.key, index, item_id = %item.id, "Skipping invalid cart entry: {}", e);
                        None
                    }
                }
            })
            .collect();

        let cart = Cart::from_items(items);
        if cart.len() != total {
            info!(
                key = %self.key,
                "Restored {} of {} stored cart entries",
                cart.len(),
                total
            );
        }
        cart.into_items()
    }

    /// Encode the cart exactly as it is stored
    pub fn encode_products(products: &[CartItem]) -> RepositoryResult<String> {
        Ok(serde_json::to_string(products)?)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl CartRepository for StorageCartRepository {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn load_products(&self) -> RepositoryResult<Vec<CartItem>> {
        match self.storage.get_item(&self.key).await? {
            Some(raw) => {
                let products = self.decode_products(&raw);
                debug!("Loaded {} cart items", products.len());
                Ok(products)
            }
            None => {
                debug!("No stored cart found");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(skip(self, products), fields(key = %self.key, items = products.len()))]
    async fn save_products(&self, products: &[CartItem]) -> RepositoryResult<()> {
        let raw = Self::encode_products(products)?;
        self.storage.set_item(&self.key, &raw).await?;
        debug!("Saved cart");
        Ok(())
    }
}
