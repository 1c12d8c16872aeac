//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for creating or updating a blog post.
///
/// Only client-editable fields are accepted; id, owner, category and
/// timestamps are controlled by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogRequest {
    pub title: String,
    pub content: String,
}

/// Flattened read-model of a blog post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of blog posts plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPage {
    pub items: Vec<BlogResponse>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub last: bool,
}

/// Query string of `GET /blogs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBlogsQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Query string of `GET /blogs/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchBlogsQuery {
    #[serde(rename = "searchTerm", alias = "search_term", default)]
    pub search_term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBlogResponse {
    pub is_blog_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrlResponse {
    pub blog_featured_image_download_url: String,
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub intro: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub intro: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub is_user_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
