use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{ImageStorage, StorageError};

use super::upload_url;

/// Process-local image store, for tests and throwaway instances.
pub struct InMemoryImageStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    public_base_url: String,
}

impl InMemoryImageStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.objects
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.objects.read().await.get(name).cloned())
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(name))
    }

    fn public_url(&self, name: &str) -> String {
        upload_url(&self.public_base_url, name)
    }
}
