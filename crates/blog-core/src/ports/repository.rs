use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, Category, CustomerUser, Page, PageRequest};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
///
/// Soft-deleted users are still returned; callers decide how to treat them.
#[async_trait]
pub trait UserRepository: BaseRepository<CustomerUser, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerUser>, RepoError>;

    /// Stamp `deleted_at` on an active user. Returns `false` when the user
    /// is missing or already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

/// Blog post repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, Uuid> {
    /// One page of posts, ordered by the requested field with `id` as tiebreaker.
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Blog>, RepoError>;

    /// Case-insensitive substring match on title or content, newest first.
    /// The term is matched literally; an empty term matches everything.
    async fn search(&self, term: &str) -> Result<Vec<Blog>, RepoError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Blog>, RepoError>;

    async fn find_by_category_id(&self, category_id: Uuid) -> Result<Vec<Blog>, RepoError>;

    /// Persist title, content and `updated_at` of `blog` only if it still
    /// belongs to `owner_id`. Returns the stored row, or `None` if no row matched.
    async fn update_owned(&self, owner_id: Uuid, blog: &Blog) -> Result<Option<Blog>, RepoError>;

    /// Delete the post only if it belongs to `owner_id`. Returns whether a row was removed.
    async fn delete_owned(&self, owner_id: Uuid, blog_id: Uuid) -> Result<bool, RepoError>;

    /// Point the post at a stored image. Returns `None` if the post is gone.
    async fn set_featured_image(
        &self,
        blog_id: Uuid,
        image_name: &str,
    ) -> Result<Option<Blog>, RepoError>;
}
