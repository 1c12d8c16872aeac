use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blog_shared::dto::{CreateUserRequest, UserResponse};

use crate::domain::CustomerUser;
use crate::error::DomainError;
use crate::ports::{PasswordService, UserRepository};
use crate::validation::validate_new_user;

use super::{ServiceResult, ServiceSettings, UserService, bounded};

pub struct DefaultUserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    settings: ServiceSettings,
}

impl DefaultUserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            users,
            passwords,
            settings,
        }
    }
}

fn to_response(user: CustomerUser) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        intro: user.intro,
        created_at: user.created_at,
    }
}

/// Keep the domain only, so logs never carry a full address.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn create(&self, input: CreateUserRequest) -> ServiceResult<UserResponse> {
        validate_new_user(&input)?;

        // Uniqueness is case-insensitive: addresses are stored lowercased.
        let email = input.email.trim().to_lowercase();
        let masked = mask_email(&email);

        if bounded(self.settings.store_timeout, self.users.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::debug!(user_email = %masked, "Rejecting duplicate email");
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = CustomerUser::new(input.name, email, password_hash, input.intro);

        // A unique-constraint hit here means a concurrent registration won.
        let saved = bounded(self.settings.store_timeout, self.users.insert(user))
            .await
            .map_err(|e| match e {
                DomainError::Conflict(_) => {
                    DomainError::Conflict("Email already registered".to_string())
                }
                other => other,
            })?;

        tracing::info!(user_id = %saved.id, user_email = %masked, "User registered");
        Ok(to_response(saved))
    }

    async fn get(&self, user_id: Uuid) -> ServiceResult<UserResponse> {
        match bounded(self.settings.store_timeout, self.users.find_by_id(user_id)).await? {
            Some(user) if user.is_active() => Ok(to_response(user)),
            _ => Err(DomainError::not_found("User", user_id)),
        }
    }

    async fn delete(&self, user_id: Uuid) -> ServiceResult<bool> {
        let deleted = bounded(self.settings.store_timeout, self.users.soft_delete(user_id)).await?;
        if deleted {
            tracing::info!(%user_id, "User soft-deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_email("alice@x.com"), "a***@x.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
        assert_eq!(mask_email("nope"), "***");
    }
}
