//! Service layer - the only path from the HTTP layer to storage and cache.

mod blog;
mod cache;
mod category;
mod user;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use blog_shared::dto::{
    BlogPage, BlogRequest, BlogResponse, CategoryResponse, CreateCategoryRequest,
    CreateUserRequest, UserResponse,
};

use crate::domain::PageRequest;
use crate::error::DomainError;

pub use blog::DefaultBlogService;
pub use cache::{BLOGS_PREFIX, GENERATION_KEY, cache_aside, list_key, search_key};
pub use category::DefaultCategoryService;
pub use user::DefaultUserService;

pub type ServiceResult<T> = Result<T, DomainError>;

/// Tunables shared by the default service implementations.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// TTL of cached list and search responses.
    pub cache_ttl: Duration,
    /// Upper bound on any single data store or blob store call.
    pub store_timeout: Duration,
    /// Largest accepted featured image.
    pub max_image_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            store_timeout: Duration::from_secs(5),
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// A featured image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A stored image ready to be served.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blog post operations.
#[async_trait]
pub trait BlogService: Send + Sync {
    async fn list(&self, request: PageRequest) -> ServiceResult<BlogPage>;

    async fn search(&self, term: &str) -> ServiceResult<Vec<BlogResponse>>;

    async fn get(&self, blog_id: Uuid) -> ServiceResult<BlogResponse>;

    /// Returns `false` instead of an error when the post is missing or not owned.
    async fn delete(&self, user_id: Uuid, blog_id: Uuid) -> ServiceResult<bool>;

    async fn list_by_category(&self, category_id: Uuid) -> ServiceResult<Vec<BlogResponse>>;

    async fn list_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<BlogResponse>>;

    async fn create(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: BlogRequest,
    ) -> ServiceResult<BlogResponse>;

    async fn update(
        &self,
        user_id: Uuid,
        blog_id: Uuid,
        input: BlogRequest,
    ) -> ServiceResult<BlogResponse>;

    async fn upload_featured_image(
        &self,
        blog_id: Uuid,
        upload: ImageUpload,
    ) -> ServiceResult<BlogResponse>;

    async fn image_url(&self, image_name: &str) -> ServiceResult<String>;

    async fn image(&self, image_name: &str) -> ServiceResult<StoredImage>;
}

/// Customer user operations.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, input: CreateUserRequest) -> ServiceResult<UserResponse>;

    async fn get(&self, user_id: Uuid) -> ServiceResult<UserResponse>;

    /// Soft delete. Returns `false` when the user is missing or already deleted.
    async fn delete(&self, user_id: Uuid) -> ServiceResult<bool>;
}

/// Blog category operations.
#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn create(&self, input: CreateCategoryRequest) -> ServiceResult<CategoryResponse>;

    async fn get(&self, category_id: Uuid) -> ServiceResult<CategoryResponse>;

    async fn list(&self) -> ServiceResult<Vec<CategoryResponse>>;
}

/// Run a store call under `limit`, converting its error and a timeout into
/// domain errors.
pub(crate) async fn bounded<T, E, F>(limit: Duration, call: F) -> ServiceResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<DomainError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Store call timed out");
            Err(DomainError::Unavailable(
                "data store did not respond in time".to_string(),
            ))
        }
    }
}
