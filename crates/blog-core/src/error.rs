//! Domain-level error types.

use blog_shared::FieldViolation;
use thiserror::Error;

use crate::ports::{AuthError, StorageError};

/// Domain errors - business logic failures surfaced to callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Validation failure on a single field.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(field, message)])
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => DomainError::Unavailable(msg),
            RepoError::Query(msg) => DomainError::Internal(msg),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => DomainError::Unavailable(msg),
            StorageError::Io(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        DomainError::Internal(err.to_string())
    }
}
