use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blog_shared::dto::{CategoryResponse, CreateCategoryRequest};

use crate::domain::Category;
use crate::error::DomainError;
use crate::ports::CategoryRepository;
use crate::validation::validate_category;

use super::{CategoryService, ServiceResult, ServiceSettings, bounded};

pub struct DefaultCategoryService {
    categories: Arc<dyn CategoryRepository>,
    settings: ServiceSettings,
}

impl DefaultCategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, settings: ServiceSettings) -> Self {
        Self {
            categories,
            settings,
        }
    }
}

fn to_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        created_at: category.created_at,
    }
}

#[async_trait]
impl CategoryService for DefaultCategoryService {
    async fn create(&self, input: CreateCategoryRequest) -> ServiceResult<CategoryResponse> {
        validate_category(&input)?;
        let name = input.name.trim().to_string();

        if bounded(self.settings.store_timeout, self.categories.find_by_name(&name))
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!("Category `{name}` already exists")));
        }

        let saved = bounded(
            self.settings.store_timeout,
            self.categories.insert(Category::new(name)),
        )
        .await?;

        tracing::info!(category_id = %saved.id, name = %saved.name, "Category created");
        Ok(to_response(saved))
    }

    async fn get(&self, category_id: Uuid) -> ServiceResult<CategoryResponse> {
        bounded(
            self.settings.store_timeout,
            self.categories.find_by_id(category_id),
        )
        .await?
        .map(to_response)
        .ok_or_else(|| DomainError::not_found("Category", category_id))
    }

    async fn list(&self) -> ServiceResult<Vec<CategoryResponse>> {
        let categories = bounded(self.settings.store_timeout, self.categories.list_all()).await?;
        Ok(categories.into_iter().map(to_response).collect())
    }
}
