//! Blog category handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::dto::CreateCategoryRequest;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

/// GET /api/v1/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/v1/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let category = state.categories.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}
