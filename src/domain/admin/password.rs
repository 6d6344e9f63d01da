//! One-way password hashing contract

use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
///
/// A hash is never reversed; passwords are checked by `verify`.
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}
