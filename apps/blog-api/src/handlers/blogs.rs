//! Blog post handlers.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::PageRequest;
use blog_core::service::ImageUpload;
use blog_shared::dto::{
    BlogRequest, DeleteBlogResponse, ImageUrlResponse, ListBlogsQuery, SearchBlogsQuery,
};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "featuredImage";

/// GET /api/v1/blogs
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListBlogsQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::from_query(&query)?;
    let page = state.blogs.list(request).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/v1/blogs/search
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchBlogsQuery>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.search(&query.search_term).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /api/v1/blogs/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let blog = state.blogs.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blog))
}

/// DELETE /api/v1/blogs/delete/{userId}/{blogId}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (user_id, blog_id) = path.into_inner();
    let is_blog_deleted = state.blogs.delete(user_id, blog_id).await?;
    Ok(HttpResponse::Ok().json(DeleteBlogResponse { is_blog_deleted }))
}

/// GET /api/v1/blogs/categories/{categoryId}
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_by_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /api/v1/blogs/user/{userId}
pub async fn list_by_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_by_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

/// POST /api/v1/blogs/create/{userId}/{categoryId}
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<BlogRequest>,
) -> AppResult<HttpResponse> {
    let (user_id, category_id) = path.into_inner();
    let blog = state
        .blogs
        .create(user_id, category_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(blog))
}

/// PUT /api/v1/blogs/update/{userId}/{blogId}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<BlogRequest>,
) -> AppResult<HttpResponse> {
    let (user_id, blog_id) = path.into_inner();
    let blog = state.blogs.update(user_id, blog_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blog))
}

/// POST /api/v1/blogs/image/upload/{blogId}
///
/// Reads the `featuredImage` part of a multipart body, refusing to buffer
/// more than the configured upload limit.
pub async fn upload_image(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request_id: RequestId,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let blog_id = path.into_inner();

    let mut upload = None;
    while let Some(field) = payload.try_next().await.map_err(multipart_err)? {
        if field.name() == Some(IMAGE_FIELD) {
            upload = Some(read_image(field, state.upload_limit).await?);
            break;
        }
    }

    let upload = upload.ok_or_else(|| {
        AppError::from(DomainError::invalid(IMAGE_FIELD, "Featured image is required"))
    })?;

    tracing::debug!(
        request_id = request_id.as_str(),
        %blog_id,
        bytes = upload.bytes.len(),
        "Received featured image"
    );
    let blog = state.blogs.upload_featured_image(blog_id, upload).await?;
    Ok(HttpResponse::Ok().json(blog))
}

/// GET /api/v1/blogs/image/get/{imageName}
pub async fn image_url(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let url = state.blogs.image_url(&path).await?;
    Ok(HttpResponse::Ok().json(ImageUrlResponse {
        blog_featured_image_download_url: url,
    }))
}

async fn read_image(mut field: Field, limit: usize) -> AppResult<ImageUpload> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string);
    let content_type = field.content_type().map(|m| m.essence_str().to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_err)? {
        if bytes.len() + chunk.len() > limit {
            return Err(DomainError::invalid(
                IMAGE_FIELD,
                format!("Featured image must be at most {limit} bytes"),
            )
            .into());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ImageUpload {
        file_name,
        content_type,
        bytes,
    })
}

fn multipart_err(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {err}"))
}
