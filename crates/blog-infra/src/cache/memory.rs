//! In-memory cache - the default backend, and the fallback when Redis is unreachable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Process-local cache backed by a `HashMap` behind an async `RwLock`.
///
/// Entries are lost on restart and are not shared between instances.
/// Expired entries are dropped lazily on read and on prefix deletion.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.store
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Expired: upgrade to a write lock and re-check before removing.
        let mut store = self.store.write().await;
        if store.get(key).is_some_and(|e| e.is_expired(now)) {
            store.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: ttl.map(|d| Instant::now() + d),
        };
        self.store.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let now = Instant::now();
        self.store
            .write()
            .await
            .retain(|k, e| !k.starts_with(prefix) && !e.is_expired(now));
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("blogs:search:rust", "[]", None).await.unwrap();
        assert_eq!(cache.get("blogs:search:rust").await, Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set("short", "v", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.exists("short").await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!cache.exists("short").await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_prefix_keeps_other_namespaces() {
        let cache = InMemoryCache::new();
        cache.set("blogs:list:0:10:created_at:desc", "{}", None).await.unwrap();
        cache.set("blogs:search:", "[]", None).await.unwrap();
        cache.set("categories:all", "[]", None).await.unwrap();

        cache.delete_prefix("blogs:").await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert!(cache.exists("categories:all").await);
    }
}
