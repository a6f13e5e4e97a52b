//! File-backed storage: one file per key inside a data directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::KeyValueStorage;
use crate::models::{StorageError, StorageResult};

const ENTRY_EXTENSION: &str = "kv";
const TEMP_EXTENSION: &str = "kv.tmp";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(self
            .root
            .join(format!("{}.{}", encode_key(key)?, ENTRY_EXTENSION)))
    }

    fn temp_path(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(self
            .root
            .join(format!("{}.{}", encode_key(key)?, TEMP_EXTENSION)))
    }
}

/// Map a key onto a file name. Bytes outside `[A-Za-z0-9_-]` become `%XX`,
/// so distinct keys never share a file.
fn encode_key(key: &str) -> StorageResult<String> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            key: key.to_string(),
        });
    }

    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            // dots included, so `..` cannot leave the root
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    Ok(encoded)
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.entry_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored entry at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(io_error(key, e)),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display(), bytes = value.len()))]
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        let temp_path = self.temp_path(key)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;

        // Rename over the target so readers never observe a partial write
        tokio::fs::write(&temp_path, value)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!("Stored entry at {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding() {
        assert_eq!(
            encode_key("@GoMarketplace:products").unwrap(),
            "%40GoMarketplace%3Aproducts"
        );
        assert_eq!(encode_key("plain-key_1").unwrap(), "plain-key_1");
        assert_eq!(encode_key("../escape").unwrap(), "%2E%2E%2Fescape");
    }

    #[test]
    fn test_key_encoding_is_injective_for_lookalikes() {
        assert_ne!(encode_key("a:b").unwrap(), encode_key("a_b").unwrap());
        assert_ne!(encode_key("a%3Ab").unwrap(), encode_key("a:b").unwrap());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            encode_key(""),
            Err(StorageError::InvalidKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_entry_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get_item("@GoMarketplace:products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.set_item("@GoMarketplace:products", "[1]").await.unwrap();
        storage.set_item("@GoMarketplace:products", "[2]").await.unwrap();

        assert_eq!(
            storage
                .get_item("@GoMarketplace:products")
                .await
                .unwrap()
                .as_deref(),
            Some("[2]")
        );

        let path = storage.entry_path("@GoMarketplace:products").unwrap();
        assert!(path.exists());
        assert!(!storage.temp_path("@GoMarketplace:products").unwrap().exists());
    }

    #[tokio::test]
    async fn test_empty_key_errors_on_io() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.set_item("", "v").await.is_err());
        assert!(storage.get_item("").await.is_err());
    }
}
