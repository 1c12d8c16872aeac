//! Binary object storage for uploaded images.

use async_trait::async_trait;

/// Image storage trait - abstraction over the blob store (local disk, memory).
///
/// Names passed in are already validated by the service layer.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `bytes` under `name`, replacing any previous object.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Load an object, `None` if it does not exist.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Public URL the object can be downloaded from.
    fn public_url(&self, name: &str) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}
