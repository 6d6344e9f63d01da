//! Password hashing using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::domain::{DomainError, PasswordHasher};

/// Argon2id password hasher producing PHC strings
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Option<Params>,
}

impl Argon2Hasher {
    /// Create a hasher with the library's default cost parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher with explicit cost parameters
    pub fn with_params(params: Params) -> Self {
        Self {
            params: Some(params),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            None => Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        // Cost parameters are read from the PHC string itself
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(8, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("battery staple", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();

        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn test_default_hasher_verifies_fast_hash() {
        let hash = fast_hasher().hash("portable").unwrap();
        assert!(Argon2Hasher::new().verify("portable", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = fast_hasher();

        assert!(!hasher.verify("password", "not-a-phc-string"));
        assert!(!hasher.verify("password", ""));
    }
}
