//! Customer user handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::dto::{CreateUserRequest, DeleteUserResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.users.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// GET /api/v1/users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let is_user_deleted = state.users.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteUserResponse { is_user_deleted }))
}
