//! Admin aggregate root

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::password::PasswordHasher;
use super::validation::{normalize_username, validate_username, AdminValidationError};
use crate::domain::{AdminId, DomainError};

/// Operator account with system management privileges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin {
    id: AdminId,
    username: String,
    /// Password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl Admin {
    /// Create an admin, hashing `plain_password` with `hasher`
    pub fn new(
        username: &str,
        plain_password: &str,
        hasher: &dyn PasswordHasher,
    ) -> Result<Self, DomainError> {
        if plain_password.is_empty() {
            return Err(AdminValidationError::EmptyPassword.into());
        }

        let password_hash = hasher.hash(plain_password)?;
        Ok(Self::with_hash(username, &password_hash)?)
    }

    /// Create an admin from an already hashed password
    pub fn with_hash(username: &str, password_hash: &str) -> Result<Self, AdminValidationError> {
        let admin = Self {
            id: AdminId::generate(),
            username: normalize_username(username),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        admin.validate_invariants()?;
        Ok(admin)
    }

    /// Rebuild an admin from persisted state
    pub fn restore(
        id: AdminId,
        username: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &AdminId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check a candidate password against the stored hash
    pub fn validate_password(&self, candidate: &str, hasher: &dyn PasswordHasher) -> bool {
        hasher.verify(candidate, &self.password_hash)
    }

    /// Re-hash and store a new password. Leaves the admin unchanged on failure.
    pub fn update_password(
        &mut self,
        plain_password: &str,
        hasher: &dyn PasswordHasher,
    ) -> Result<(), DomainError> {
        if plain_password.is_empty() {
            return Err(AdminValidationError::EmptyPassword.into());
        }

        let mut candidate = self.clone();
        candidate.password_hash = hasher.hash(plain_password)?;
        candidate.validate_invariants()?;

        *self = candidate;
        Ok(())
    }

    /// Check every aggregate invariant
    pub fn validate_invariants(&self) -> Result<(), AdminValidationError> {
        validate_username(&self.username)?;

        if self.password_hash.is_empty() {
            return Err(AdminValidationError::EmptyPasswordHash);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::password::fake::FakeHasher;

    #[test]
    fn test_admin_creation_hashes_password() {
        let hasher = FakeHasher;
        let admin = Admin::new("  admin ", "s3cret-pass", &hasher).unwrap();

        assert_eq!(admin.username(), "admin");
        assert_ne!(admin.password_hash(), "s3cret-pass");
        assert!(admin.validate_password("s3cret-pass", &hasher));
        assert!(!admin.validate_password("wrong", &hasher));
    }

    #[test]
    fn test_admin_requires_password() {
        let err = Admin::new("admin", "", &FakeHasher).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Password cannot be empty");
    }

    #[test]
    fn test_admin_username_rules() {
        assert_eq!(
            Admin::with_hash("  ", "hash"),
            Err(AdminValidationError::EmptyUsername)
        );
        assert_eq!(
            Admin::with_hash(" ab ", "hash"),
            Err(AdminValidationError::UsernameTooShort(3))
        );
    }

    #[test]
    fn test_admin_with_hash() {
        let admin = Admin::with_hash("operator", "precomputed").unwrap();
        assert_eq!(admin.password_hash(), "precomputed");

        assert_eq!(
            Admin::with_hash("operator", ""),
            Err(AdminValidationError::EmptyPasswordHash)
        );
    }

    #[test]
    fn test_update_password() {
        let hasher = FakeHasher;
        let mut admin = Admin::new("admin", "first-pass", &hasher).unwrap();

        admin.update_password("second-pass", &hasher).unwrap();
        assert!(admin.validate_password("second-pass", &hasher));
        assert!(!admin.validate_password("first-pass", &hasher));
    }

    #[test]
    fn test_failed_update_password_leaves_admin_unchanged() {
        let hasher = FakeHasher;
        let mut admin = Admin::new("admin", "first-pass", &hasher).unwrap();
        let snapshot = admin.clone();

        assert!(admin.update_password("", &hasher).unwrap_err().is_validation());
        assert_eq!(admin, snapshot);
    }

    #[test]
    fn test_serialization_excludes_password() {
        let admin = Admin::with_hash("admin", "hashed_password").unwrap();

        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }
}
