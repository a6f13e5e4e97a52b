// Storage module - device-local key-value persistence

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::InMemoryStorage;

use async_trait::async_trait;

use crate::models::StorageResult;

/// Async string key-value storage, the device-local persistence seam.
///
/// Values are opaque strings; encoding is the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}
