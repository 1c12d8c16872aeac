//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use blog_core::ports::{AuthError, PasswordService};

/// Argon2-based password service producing PHC strings (`$argon2id$...`).
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Library default cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Custom cost parameters, e.g. a cheap profile for tests.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let service = cheap();
        let hash = service.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret1"));
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"secret1", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"secret2", &parsed).is_err());
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let service = cheap();
        assert_ne!(service.hash("secret1").unwrap(), service.hash("secret1").unwrap());
    }

    #[test]
    fn hash_records_configured_cost() {
        let hash = cheap().hash("secret1").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert_eq!(parsed.params.get_decimal("m"), Some(1024));
        assert_eq!(parsed.params.get_decimal("t"), Some(1));
    }
}
