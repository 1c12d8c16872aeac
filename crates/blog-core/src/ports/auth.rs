//! Credential hashing port.

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Hashing error: {0}")]
    HashingError(String),
}
