//! Default blog service: validation, ownership checks, caching and DTO shaping.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blog_shared::dto::{BlogPage, BlogRequest, BlogResponse};

use crate::domain::{Blog, PageRequest};
use crate::error::DomainError;
use crate::ports::{BlogRepository, Cache, CategoryRepository, ImageStorage, UserRepository};
use crate::validation::{is_valid_image_name, validate_blog};

use super::cache::{cached_blogs, invalidate_blogs, list_key, search_key};
use super::{BlogService, ImageUpload, ServiceResult, ServiceSettings, StoredImage, bounded};

const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

pub struct DefaultBlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    cache: Arc<dyn Cache>,
    images: Arc<dyn ImageStorage>,
    settings: ServiceSettings,
}

impl DefaultBlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        cache: Arc<dyn Cache>,
        images: Arc<dyn ImageStorage>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            blogs,
            users,
            categories,
            cache,
            images,
            settings,
        }
    }

    fn to_response(&self, blog: Blog) -> BlogResponse {
        let featured_image_url = blog
            .featured_image
            .as_deref()
            .map(|name| self.images.public_url(name));
        BlogResponse {
            id: blog.id,
            title: blog.title,
            content: blog.content,
            user_id: blog.user_id,
            category_id: blog.category_id,
            featured_image: blog.featured_image,
            featured_image_url,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }

    fn to_responses(&self, blogs: Vec<Blog>) -> Vec<BlogResponse> {
        blogs.into_iter().map(|b| self.to_response(b)).collect()
    }

    /// Soft-deleted users count as missing.
    async fn is_active_user(&self, user_id: Uuid) -> ServiceResult<bool> {
        let user = bounded(self.settings.store_timeout, self.users.find_by_id(user_id)).await?;
        Ok(user.is_some_and(|u| u.is_active()))
    }

    async fn require_active_user(&self, user_id: Uuid) -> ServiceResult<()> {
        if self.is_active_user(user_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("User", user_id))
        }
    }

    async fn require_category(&self, category_id: Uuid) -> ServiceResult<()> {
        bounded(
            self.settings.store_timeout,
            self.categories.find_by_id(category_id),
        )
        .await?
        .map(|_| ())
        .ok_or_else(|| DomainError::not_found("Category", category_id))
    }

    async fn find_blog(&self, blog_id: Uuid) -> ServiceResult<Blog> {
        bounded(self.settings.store_timeout, self.blogs.find_by_id(blog_id))
            .await?
            .ok_or_else(|| DomainError::not_found("Blog", blog_id))
    }

    fn check_image_name(image_name: &str) -> ServiceResult<()> {
        if is_valid_image_name(image_name) {
            Ok(())
        } else {
            Err(DomainError::not_found("Image", image_name))
        }
    }

    /// Resolve the stored extension from the declared type, or failing that
    /// from the file name.
    fn image_extension(upload: &ImageUpload) -> ServiceResult<&'static str> {
        let declared = upload
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| ct != "application/octet-stream");

        let mime = declared.or_else(|| {
            upload
                .file_name
                .as_deref()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.essence_str().to_string())
        });

        mime.and_then(|mime| {
            ALLOWED_IMAGE_TYPES
                .iter()
                .find(|(ct, _)| *ct == mime)
                .map(|(_, ext)| *ext)
        })
        .ok_or_else(|| {
            DomainError::invalid(
                "featuredImage",
                "Featured image must be a png, jpeg, gif or webp image",
            )
        })
    }
}

#[async_trait]
impl BlogService for DefaultBlogService {
    async fn list(&self, request: PageRequest) -> ServiceResult<BlogPage> {
        let key = |generation: &str| list_key(generation, &request);
        cached_blogs(self.cache.as_ref(), self.settings.cache_ttl, key, || async {
            let page = bounded(self.settings.store_timeout, self.blogs.find_page(&request)).await?;
            let total_pages = page.total_pages(request.size);
            Ok(BlogPage {
                items: self.to_responses(page.items),
                page: request.page,
                size: request.size,
                total_items: page.total_items,
                total_pages,
                last: request.is_last(total_pages),
            })
        })
        .await
    }

    async fn search(&self, term: &str) -> ServiceResult<Vec<BlogResponse>> {
        let key = |generation: &str| search_key(generation, term);
        cached_blogs(self.cache.as_ref(), self.settings.cache_ttl, key, || async {
            let blogs = bounded(self.settings.store_timeout, self.blogs.search(term)).await?;
            Ok(self.to_responses(blogs))
        })
        .await
    }

    async fn get(&self, blog_id: Uuid) -> ServiceResult<BlogResponse> {
        let blog = self.find_blog(blog_id).await?;
        Ok(self.to_response(blog))
    }

    async fn delete(&self, user_id: Uuid, blog_id: Uuid) -> ServiceResult<bool> {
        if !self.is_active_user(user_id).await? {
            tracing::debug!(%user_id, %blog_id, "Nothing deleted: user missing or deleted");
            return Ok(false);
        }

        let deleted = bounded(
            self.settings.store_timeout,
            self.blogs.delete_owned(user_id, blog_id),
        )
        .await?;

        if deleted {
            invalidate_blogs(self.cache.as_ref()).await;
            tracing::info!(%user_id, %blog_id, "Blog deleted");
        } else {
            tracing::debug!(%user_id, %blog_id, "Nothing deleted: blog missing or not owned");
        }
        Ok(deleted)
    }

    async fn list_by_category(&self, category_id: Uuid) -> ServiceResult<Vec<BlogResponse>> {
        self.require_category(category_id).await?;
        let blogs = bounded(
            self.settings.store_timeout,
            self.blogs.find_by_category_id(category_id),
        )
        .await?;
        Ok(self.to_responses(blogs))
    }

    async fn list_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<BlogResponse>> {
        self.require_active_user(user_id).await?;
        let blogs = bounded(
            self.settings.store_timeout,
            self.blogs.find_by_user_id(user_id),
        )
        .await?;
        Ok(self.to_responses(blogs))
    }

    async fn create(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: BlogRequest,
    ) -> ServiceResult<BlogResponse> {
        validate_blog(&input)?;
        self.require_active_user(user_id).await?;
        self.require_category(category_id).await?;

        let blog = Blog::new(user_id, category_id, input);
        let saved = bounded(self.settings.store_timeout, self.blogs.insert(blog)).await?;
        invalidate_blogs(self.cache.as_ref()).await;

        tracing::info!(blog_id = %saved.id, %user_id, %category_id, "Blog created");
        Ok(self.to_response(saved))
    }

    async fn update(
        &self,
        user_id: Uuid,
        blog_id: Uuid,
        input: BlogRequest,
    ) -> ServiceResult<BlogResponse> {
        validate_blog(&input)?;
        self.require_active_user(user_id).await?;

        let mut blog = self.find_blog(blog_id).await?;
        if !blog.is_owned_by(user_id) {
            return Err(DomainError::Forbidden(format!(
                "Blog {blog_id} does not belong to user {user_id}"
            )));
        }

        if !blog.apply(input) {
            tracing::debug!(%blog_id, "Update payload matches stored blog");
            return Ok(self.to_response(blog));
        }

        // The row may have been deleted or reassigned since it was read.
        let saved = bounded(
            self.settings.store_timeout,
            self.blogs.update_owned(user_id, &blog),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Blog", blog_id))?;
        invalidate_blogs(self.cache.as_ref()).await;

        tracing::info!(%blog_id, %user_id, "Blog updated");
        Ok(self.to_response(saved))
    }

    async fn upload_featured_image(
        &self,
        blog_id: Uuid,
        upload: ImageUpload,
    ) -> ServiceResult<BlogResponse> {
        if upload.bytes.is_empty() {
            return Err(DomainError::invalid("featuredImage", "Uploaded file is empty"));
        }
        if upload.bytes.len() > self.settings.max_image_bytes {
            return Err(DomainError::invalid(
                "featuredImage",
                format!(
                    "Featured image must be at most {} bytes",
                    self.settings.max_image_bytes
                ),
            ));
        }
        let extension = Self::image_extension(&upload)?;
        self.find_blog(blog_id).await?;

        let image_name = format!("{}.{extension}", Uuid::new_v4().simple());
        bounded(
            self.settings.store_timeout,
            self.images.put(&image_name, &upload.bytes),
        )
        .await?;

        let saved = bounded(
            self.settings.store_timeout,
            self.blogs.set_featured_image(blog_id, &image_name),
        )
        .await?
        .ok_or_else(|| DomainError::not_found("Blog", blog_id))?;
        invalidate_blogs(self.cache.as_ref()).await;

        tracing::info!(%blog_id, image = %image_name, bytes = upload.bytes.len(), "Featured image stored");
        Ok(self.to_response(saved))
    }

    async fn image_url(&self, image_name: &str) -> ServiceResult<String> {
        Self::check_image_name(image_name)?;
        if !bounded(self.settings.store_timeout, self.images.exists(image_name)).await? {
            return Err(DomainError::not_found("Image", image_name));
        }
        Ok(self.images.public_url(image_name))
    }

    async fn image(&self, image_name: &str) -> ServiceResult<StoredImage> {
        Self::check_image_name(image_name)?;
        let bytes = bounded(self.settings.store_timeout, self.images.get(image_name))
            .await?
            .ok_or_else(|| DomainError::not_found("Image", image_name))?;
        let content_type = mime_guess::from_path(image_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(StoredImage {
            name: image_name.to_string(),
            content_type,
            bytes,
        })
    }
}
