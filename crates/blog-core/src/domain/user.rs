use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer user - the author of blog posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub intro: String,
    pub created_at: DateTime<Utc>,
    /// Set when the user is soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CustomerUser {
    /// Create a new active user with generated ID and timestamp.
    pub fn new(name: String, email: String, password_hash: String, intro: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            intro,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
