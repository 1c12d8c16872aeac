//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use blog_core::service::ServiceSettings;

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConfig;
#[cfg(feature = "redis")]
use blog_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on in-memory repositories.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub run_migrations: bool,
    /// `None` runs on the in-memory cache.
    pub redis_url: Option<String>,
    pub redis_connect_timeout: Duration,
    pub redis_fallback_to_memory: bool,
    pub cache_ttl: Duration,
    pub store_timeout: Duration,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    /// Base of the image download URLs handed to clients.
    pub public_base_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unparseable values fall back
    /// to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16);
        let public_base_url = non_empty("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{host}:{port}"));

        Self {
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 100),
            db_min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 10),
            run_migrations: flag_or(&lookup, "RUN_MIGRATIONS", false),
            redis_url: non_empty("REDIS_URL"),
            redis_connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REDIS_CONNECT_TIMEOUT_SECS",
                5,
            )),
            redis_fallback_to_memory: flag_or(&lookup, "REDIS_FALLBACK_TO_MEMORY", true),
            cache_ttl: Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 300)),
            store_timeout: Duration::from_millis(parse_or(&lookup, "STORE_TIMEOUT_MS", 5000)),
            upload_dir: non_empty("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            upload_max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", 5 * 1024 * 1024),
            public_base_url,
            host,
            port,
        }
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            cache_ttl: self.cache_ttl,
            store_timeout: self.store_timeout,
            max_image_bytes: self.upload_max_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn database_config(&self) -> Option<DatabaseConfig> {
        self.database_url.as_ref().map(|url| DatabaseConfig {
            url: url.clone(),
            max_connections: self.db_max_connections,
            min_connections: self.db_min_connections,
            acquire_timeout: self.store_timeout,
        })
    }

    #[cfg(feature = "redis")]
    pub fn redis_config(&self) -> Option<RedisConfig> {
        self.redis_url.as_ref().map(|url| RedisConfig {
            url: url.clone(),
            connect_timeout: self.redis_connect_timeout,
            fallback_to_memory: self.redis_fallback_to_memory,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            default
        }),
        _ => default,
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
        assert!(!config.run_migrations);
        assert!(config.redis_fallback_to_memory);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
        assert_eq!(config.upload_max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.public_base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://blog@localhost/blog"),
            ("RUN_MIGRATIONS", "true"),
            ("CACHE_TTL_SECS", "60"),
            ("PUBLIC_BASE_URL", "https://blog.example.com/"),
        ]);

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://blog@localhost/blog")
        );
        assert!(config.run_migrations);
        assert_eq!(config.service_settings().cache_ttl, Duration::from_secs(60));
        assert_eq!(config.public_base_url, "https://blog.example.com");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("DATABASE_URL", "  "), ("RUN_MIGRATIONS", "maybe")]);

        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert!(!config.run_migrations);
    }
}
