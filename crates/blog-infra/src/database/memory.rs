//! In-memory repositories, used when no database is configured and in tests.
//!
//! Each repository keeps its rows in a `HashMap` behind an async `RwLock`.
//! Unique keys are enforced the same way the PostgreSQL schema enforces
//! them, and conditional writes hold the write lock across the check and the
//! mutation so ownership checks cannot race.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{
    Blog, Category, CustomerUser, Page, PageRequest, SortDirection, SortField,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogRepository, CategoryRepository, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<HashMap<Uuid, CustomerUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<CustomerUser, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerUser>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: CustomerUser) -> Result<CustomerUser, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&user.id) || rows.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint on email".to_string(),
            ));
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerUser>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(user) if user.deleted_at.is_none() => {
                user.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    rows: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&category.id) || rows.values().any(|c| c.name == category.name) {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint on name".to_string(),
            ));
        }
        rows.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut all: Vec<Category> = self.rows.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}

#[derive(Default)]
pub struct InMemoryBlogRepository {
    rows: RwLock<HashMap<Uuid, Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Blog, b: &Blog, sort: SortField, direction: SortDirection) -> Ordering {
    let primary = match sort {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
    };
    let primary = match direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then(a.id.cmp(&b.id))
}

fn newest_first(mut blogs: Vec<Blog>) -> Vec<Blog> {
    blogs.sort_by(|a, b| compare(a, b, SortField::CreatedAt, SortDirection::Desc));
    blogs
}

#[async_trait]
impl BaseRepository<Blog, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&blog.id) {
            return Err(RepoError::Constraint(format!("blog {} already exists", blog.id)));
        }
        rows.insert(blog.id, blog.clone());
        Ok(blog)
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Blog>, RepoError> {
        let rows = self.rows.read().await;
        let mut all: Vec<&Blog> = rows.values().collect();
        all.sort_by(|a, b| compare(a, b, request.sort, request.direction));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(size).cloned().collect();

        Ok(Page {
            items,
            total_items: rows.len() as u64,
        })
    }

    async fn search(&self, term: &str) -> Result<Vec<Blog>, RepoError> {
        let needle = term.to_lowercase();
        let found = self
            .rows
            .read()
            .await
            .values()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Blog>, RepoError> {
        let found = self
            .rows
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn find_by_category_id(&self, category_id: Uuid) -> Result<Vec<Blog>, RepoError> {
        let found = self
            .rows
            .read()
            .await
            .values()
            .filter(|b| b.category_id == category_id)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn update_owned(&self, owner_id: Uuid, blog: &Blog) -> Result<Option<Blog>, RepoError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&blog.id) {
            Some(stored) if stored.user_id == owner_id => {
                stored.title = blog.title.clone();
                stored.content = blog.content.clone();
                stored.updated_at = blog.updated_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, owner_id: Uuid, blog_id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.get(&blog_id).is_some_and(|b| b.user_id == owner_id) {
            rows.remove(&blog_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn set_featured_image(
        &self,
        blog_id: Uuid,
        image_name: &str,
    ) -> Result<Option<Blog>, RepoError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&blog_id).map(|stored| {
            stored.featured_image = Some(image_name.to_string());
            stored.updated_at = Utc::now();
            stored.clone()
        }))
    }
}
