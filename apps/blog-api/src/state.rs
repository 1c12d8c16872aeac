//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    BlogRepository, Cache, CategoryRepository, ImageStorage, PasswordService, UserRepository,
};
use blog_core::service::{
    BlogService, CategoryService, DefaultBlogService, DefaultCategoryService, DefaultUserService,
    ServiceSettings, UserService,
};
use blog_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryCache, InMemoryCategoryRepository,
    InMemoryImageStorage, InMemoryUserRepository, LocalImageStorage,
};

#[cfg(feature = "postgres")]
use blog_infra::{
    DatabaseConnections, PostgresBlogRepository, PostgresCategoryRepository,
    PostgresUserRepository,
};
#[cfg(feature = "postgres")]
use migration::MigratorTrait;

use crate::config::AppConfig;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(String),

    #[error("cache: {0}")]
    Cache(String),

    #[error("image storage: {0}")]
    Storage(#[from] std::io::Error),
}

/// Which backends the running instance is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageMode {
    pub database: &'static str,
    pub cache: &'static str,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<dyn BlogService>,
    pub users: Arc<dyn UserService>,
    pub categories: Arc<dyn CategoryService>,
    pub storage: StorageMode,
    /// Largest multipart body accepted for an image upload.
    pub upload_limit: usize,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

struct Repositories {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            blogs: Arc::new(InMemoryBlogRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        #[cfg(feature = "postgres")]
        let (db, repos, database) = Self::connect_database(config).await?;

        #[cfg(not(feature = "postgres"))]
        let (repos, database) = {
            if config.database_url.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            (Repositories::in_memory(), "memory")
        };

        let (cache, cache_mode) = Self::connect_cache(config).await?;
        let images: Arc<dyn ImageStorage> = Arc::new(LocalImageStorage::new(
            &config.upload_dir,
            config.public_base_url.clone(),
        )?);

        let mut state = Self::assemble(repos, cache, images, config.service_settings());
        state.storage = StorageMode {
            database,
            cache: cache_mode,
        };
        state.upload_limit = config.upload_max_bytes;
        #[cfg(feature = "postgres")]
        {
            state.db = db;
        }

        tracing::info!(
            database = state.storage.database,
            cache = state.storage.cache,
            "Application state initialized"
        );
        Ok(state)
    }

    /// Fully in-memory state, for tests and local experiments.
    pub fn in_memory(public_base_url: &str, settings: ServiceSettings) -> Self {
        Self::assemble(
            Repositories::in_memory(),
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryImageStorage::new(public_base_url)),
            settings,
        )
    }

    fn assemble(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        images: Arc<dyn ImageStorage>,
        settings: ServiceSettings,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let upload_limit = settings.max_image_bytes;

        Self {
            blogs: Arc::new(DefaultBlogService::new(
                repos.blogs,
                repos.users.clone(),
                repos.categories.clone(),
                cache,
                images,
                settings.clone(),
            )),
            users: Arc::new(DefaultUserService::new(
                repos.users,
                passwords,
                settings.clone(),
            )),
            categories: Arc::new(DefaultCategoryService::new(repos.categories, settings)),
            storage: StorageMode {
                database: "memory",
                cache: "memory",
            },
            upload_limit,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_database(
        config: &AppConfig,
    ) -> Result<(Option<Arc<DatabaseConnections>>, Repositories, &'static str), StartupError> {
        let Some(db_config) = config.database_config() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok((None, Repositories::in_memory(), "memory"));
        };

        let connections = DatabaseConnections::init(&db_config)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        if config.run_migrations {
            migration::Migrator::up(&connections.main, None)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            tracing::info!("Database migrations applied");
        }

        let conn = connections.main.clone();
        let repos = Repositories {
            blogs: Arc::new(PostgresBlogRepository::new(conn.clone())),
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(conn)),
        };
        Ok((Some(Arc::new(connections)), repos, "postgres"))
    }

    #[cfg(feature = "redis")]
    async fn connect_cache(
        config: &AppConfig,
    ) -> Result<(Arc<dyn Cache>, &'static str), StartupError> {
        let Some(redis_config) = config.redis_config() else {
            return Ok((Arc::new(InMemoryCache::new()), "memory"));
        };

        match blog_infra::RedisCache::new(&redis_config).await {
            Ok(cache) => Ok((Arc::new(cache), "redis")),
            Err(e) if redis_config.fallback_to_memory => {
                tracing::warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
                Ok((Arc::new(InMemoryCache::new()), "memory"))
            }
            Err(e) => Err(StartupError::Cache(e.to_string())),
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn connect_cache(
        config: &AppConfig,
    ) -> Result<(Arc<dyn Cache>, &'static str), StartupError> {
        if config.redis_url.is_some() {
            tracing::warn!("REDIS_URL ignored: built without the redis feature");
        }
        Ok((Arc::new(InMemoryCache::new()), "memory"))
    }
}
