//! Redis cache implementation.
//!
//! Every key written through this cache is also recorded in a per-namespace
//! index (`cache:index:<namespace>`, namespace = text before the first `:`),
//! so `delete_prefix` can find its keys without `SCAN`. The index is a sorted
//! set scored by each key's expiry time; every write drops members that have
//! already expired, so short-lived keys do not pile up between invalidations.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use chrono::Utc;
use redis::{AsyncCommands, Client};

use blog_core::ports::{Cache, CacheError};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fall back to the in-memory cache if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

fn index_key(key_or_prefix: &str) -> String {
    let namespace = key_or_prefix.split(':').next().unwrap_or(key_or_prefix);
    format!("cache:index:{namespace}")
}

fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Unix time at which a key written at `now` expires; keys without a TTL never do.
fn index_score(now: i64, ttl: Option<Duration>) -> i64 {
    match ttl {
        Some(ttl) => now.saturating_add(i64::try_from(ttl_secs(ttl)).unwrap_or(i64::MAX)),
        None => i64::MAX,
    }
}

/// Redis-backed cache using a connection manager for reconnection and pooling.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        // Bound the handshake so an unreachable server cannot stall startup.
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis cache");

        Ok(Self { conn })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let now = Utc::now().timestamp();
        let index = index_key(key);

        let mut pipe = redis::pipe();
        match ttl {
            Some(duration) => pipe.set_ex(key, value, ttl_secs(duration)),
            None => pipe.set(key, value),
        };
        pipe.zadd(&index, key, index_score(now, ttl))
            .zrembyscore(&index, "-inf", now);

        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .del(key)
            .zrem(index_key(key), key)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let index = index_key(prefix);

        let members: Vec<String> = conn
            .zrange(&index, 0, -1)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        let doomed: Vec<String> = members
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect();
        if doomed.is_empty() {
            return Ok(());
        }

        let _: () = redis::pipe()
            .del(&doomed)
            .zrem(&index, &doomed)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        tracing::debug!(prefix, removed = doomed.len(), "Invalidated cache prefix");
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(key).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_cache() -> Option<RedisCache> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            fallback_to_memory: false,
        };

        RedisCache::new(&config).await.ok()
    }

    #[test]
    fn index_key_uses_first_segment() {
        assert_eq!(index_key("blogs:list:0:10"), "cache:index:blogs");
        assert_eq!(index_key("blogs:"), "cache:index:blogs");
        assert_eq!(index_key("plain"), "cache:index:plain");
    }

    #[test]
    fn index_score_tracks_expiry() {
        assert_eq!(index_score(1_000, Some(Duration::from_secs(300))), 1_300);
        assert_eq!(index_score(1_000, Some(Duration::from_millis(10))), 1_001);
        assert_eq!(index_score(1_000, None), i64::MAX);
        assert_eq!(index_score(i64::MAX - 1, Some(Duration::from_secs(60))), i64::MAX);
    }

    #[tokio::test]
    async fn test_redis_index_drops_expired_members() {
        let Some(cache) = get_test_cache().await else {
            return;
        };

        cache.set("testprune:old", "1", Some(Duration::from_secs(1))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;
        cache.set("testprune:new", "2", Some(Duration::from_secs(30))).await.unwrap();

        let mut conn = cache.conn.clone();
        let members: Vec<String> = conn.zrange("cache:index:testprune", 0, -1).await.unwrap();
        assert_eq!(members, vec!["testprune:new".to_string()]);

        cache.delete_prefix("testprune:").await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_cache_set_get() {
        let Some(cache) = get_test_cache().await else {
            tracing::warn!("Redis not available, skipping test");
            return;
        };

        let key = "test:set_get";
        cache.set(key, "value", None).await.unwrap();
        assert_eq!(cache.get(key).await, Some("value".to_string()));

        cache.delete(key).await.unwrap();
        assert_eq!(cache.get(key).await, None);
    }

    #[tokio::test]
    async fn test_redis_delete_prefix() {
        let Some(cache) = get_test_cache().await else {
            return;
        };

        cache.set("testblogs:list:a", "1", None).await.unwrap();
        cache.set("testblogs:search:b", "2", Some(Duration::from_secs(30))).await.unwrap();
        cache.set("testother:c", "3", None).await.unwrap();

        cache.delete_prefix("testblogs:").await.unwrap();

        assert!(!cache.exists("testblogs:list:a").await);
        assert!(!cache.exists("testblogs:search:b").await);
        assert!(cache.exists("testother:c").await);
        cache.delete("testother:c").await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_cache_ttl() {
        let Some(cache) = get_test_cache().await else {
            return;
        };

        let key = "test:ttl";
        cache
            .set(key, "value", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(cache.get(key).await, Some("value".to_string()));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cache.get(key).await, None);
    }
}
