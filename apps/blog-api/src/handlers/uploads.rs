//! Serves stored featured images.

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /uploads/{imageName}
pub async fn download(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let image = state.blogs.image(&path).await?;
    Ok(HttpResponse::Ok()
        .content_type(image.content_type)
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(image.bytes))
}
