use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_shared::dto::BlogRequest;

/// Blog post entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
    /// Stored image name, resolved to a URL by the image storage.
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new post owned by `user_id` in `category_id`.
    pub fn new(user_id: Uuid, category_id: Uuid, input: BlogRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            title: input.title,
            content: input.content,
            featured_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Apply editable fields. Returns `false` (and leaves `updated_at`
    /// alone) when the input matches what is already stored.
    pub fn apply(&mut self, input: BlogRequest) -> bool {
        if self.title == input.title && self.content == input.content {
            return false;
        }
        self.title = input.title;
        self.content = input.content;
        self.updated_at = Utc::now();
        true
    }
}
