//! Cache-aside helper and key derivation for cacheable blog reads.
//!
//! Blog entries are keyed under the current cache generation
//! (`blogs:<generation>:list:...`). A write installs a fresh generation
//! before dropping the old entries, so a read that loaded before the write
//! and stores its result afterwards files it under a generation no later
//! read asks for.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::PageRequest;
use crate::error::DomainError;
use crate::ports::Cache;

/// Every cached blog response lives under this prefix.
pub const BLOGS_PREFIX: &str = "blogs:";

/// Kept outside `BLOGS_PREFIX` so invalidation never removes it.
pub const GENERATION_KEY: &str = "blog-cache:generation";

pub fn list_key(generation: &str, request: &PageRequest) -> String {
    format!("{BLOGS_PREFIX}{generation}:list:{request}")
}

/// Search is case-insensitive, so terms differing only by case share an entry.
pub fn search_key(generation: &str, term: &str) -> String {
    format!("{BLOGS_PREFIX}{generation}:search:{}", term.to_lowercase())
}

fn new_generation() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The generation reads are keyed under, or `None` when this read must skip
/// the cache. A missing generation is seeded, but the seed may have replaced
/// one installed by a concurrent write, so the seeding read is not cached.
async fn current_generation(cache: &dyn Cache) -> Option<String> {
    if let Some(generation) = cache.get(GENERATION_KEY).await {
        return Some(generation);
    }
    if let Err(e) = cache.set(GENERATION_KEY, &new_generation(), None).await {
        tracing::warn!(error = %e, "Failed to seed blog cache generation");
    }
    None
}

/// `cache_aside` for blog reads, keyed by `key` under the current generation.
pub(crate) async fn cached_blogs<T, K, F, Fut>(
    cache: &dyn Cache,
    ttl: Duration,
    key: K,
    load: F,
) -> Result<T, DomainError>
where
    T: Serialize + DeserializeOwned,
    K: FnOnce(&str) -> String,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    match current_generation(cache).await {
        Some(generation) => cache_aside(cache, &key(&generation), ttl, load).await,
        None => load().await,
    }
}

/// Return the cached value for `key`, or run `load`, cache its result and
/// return it. Undecodable entries count as misses; cache write failures are
/// logged and otherwise ignored.
pub async fn cache_aside<T, F, Fut>(
    cache: &dyn Cache,
    key: &str,
    ttl: Duration,
    load: F,
) -> Result<T, DomainError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    if let Some(raw) = cache.get(key).await {
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::trace!(key, "Cache hit");
                return Ok(value);
            }
            Err(e) => tracing::warn!(key, error = %e, "Discarding undecodable cache entry"),
        }
    }

    tracing::trace!(key, "Cache miss");
    let value = load().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(e) = cache.set(key, &raw, Some(ttl)).await {
                tracing::warn!(key, error = %e, "Failed to populate cache");
            }
        }
        Err(e) => tracing::warn!(key, error = %e, "Failed to serialize cache entry"),
    }

    Ok(value)
}

/// Retire every cached blog listing and search result.
pub(crate) async fn invalidate_blogs(cache: &dyn Cache) {
    if let Err(e) = cache.set(GENERATION_KEY, &new_generation(), None).await {
        tracing::error!(error = %e, "Failed to advance blog cache generation");
    }
    if let Err(e) = cache.delete_prefix(BLOGS_PREFIX).await {
        tracing::error!(error = %e, "Failed to invalidate blog cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CacheError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl Cache for MapCache {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), CacheError> {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }

        async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
            self.0.lock().unwrap().retain(|k, _| !k.starts_with(prefix));
            Ok(())
        }

        async fn exists(&self, key: &str) -> bool {
            self.0.lock().unwrap().contains_key(key)
        }
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache = MapCache::default();
        let loads = AtomicUsize::new(0);
        let counter = &loads;
        let ttl = Duration::from_secs(60);

        for _ in 0..2 {
            let value: Vec<u32> = cache_aside(&cache, "blogs:list:x", ttl, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
            .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn garbage_entry_is_reloaded() {
        let cache = MapCache::default();
        cache.set("k", "not json", None).await.unwrap();

        let value: u32 = cache_aside(&cache, "k", Duration::from_secs(1), || async { Ok(7) })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(cache.get("k").await.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn loader_errors_are_not_cached() {
        let cache = MapCache::default();
        let result: Result<u32, _> = cache_aside(&cache, "k", Duration::from_secs(1), || async {
            Err(DomainError::Unavailable("down".into()))
        })
        .await;

        assert!(result.is_err());
        assert!(!cache.exists("k").await);
    }

    #[tokio::test]
    async fn invalidation_only_touches_blog_keys() {
        let cache = MapCache::default();
        cache.set(&search_key("g1", "Rust"), "[]", None).await.unwrap();
        cache.set(&list_key("g1", &PageRequest::default()), "{}", None).await.unwrap();
        cache.set("users:1", "{}", None).await.unwrap();

        invalidate_blogs(&cache).await;

        assert!(!cache.exists("blogs:g1:search:rust").await);
        assert!(!cache.exists("blogs:g1:list:0:10:created_at:desc").await);
        assert!(cache.exists("users:1").await);
        assert!(cache.exists(GENERATION_KEY).await);
    }

    #[tokio::test]
    async fn first_read_seeds_generation_without_caching() {
        let cache = MapCache::default();
        let ttl = Duration::from_secs(60);

        let value: u32 = cached_blogs(&cache, ttl, |g| search_key(g, "rust"), || async { Ok(1) })
            .await
            .unwrap();

        assert_eq!(value, 1);
        let generation = cache.get(GENERATION_KEY).await.unwrap();
        assert!(!cache.exists(&search_key(&generation, "rust")).await);

        cached_blogs(&cache, ttl, |g| search_key(g, "rust"), || async { Ok(1u32) })
            .await
            .unwrap();
        assert!(cache.exists(&search_key(&generation, "rust")).await);
    }

    #[tokio::test]
    async fn load_overtaken_by_a_write_is_not_served_later() {
        let cache = MapCache::default();
        let ttl = Duration::from_secs(60);
        let key = |g: &str| list_key(g, &PageRequest::default());
        invalidate_blogs(&cache).await;

        // The write lands while the read is still loading.
        let stale: u32 = cached_blogs(&cache, ttl, key, || async {
            invalidate_blogs(&cache).await;
            Ok(1)
        })
        .await
        .unwrap();
        assert_eq!(stale, 1);

        let fresh: u32 = cached_blogs(&cache, ttl, key, || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
    }
}
