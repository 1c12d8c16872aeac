//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! repositories, caches, image storage and password hashing.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `redis` - Redis cache

pub mod auth;
pub mod cache;
pub mod database;
pub mod storage;

// Re-exports - In-Memory
pub use auth::Argon2PasswordService;
pub use cache::InMemoryCache;
pub use database::{InMemoryBlogRepository, InMemoryCategoryRepository, InMemoryUserRepository};
pub use storage::{InMemoryImageStorage, LocalImageStorage};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresBlogRepository, PostgresCategoryRepository,
    PostgresUserRepository,
};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
