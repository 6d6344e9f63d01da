//! Admin validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during admin validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdminValidationError {
    #[error("Username is required")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password hash is required")]
    EmptyPasswordHash,
}

impl From<AdminValidationError> for DomainError {
    fn from(err: AdminValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MIN_USERNAME_LENGTH: usize = 3;

/// Usernames are compared after trimming
pub fn normalize_username(username: &str) -> String {
    username.trim().to_string()
}

/// Validate an already normalized username
///
/// Rules:
/// - Cannot be empty
/// - Minimum 3 characters
pub fn validate_username(username: &str) -> Result<(), AdminValidationError> {
    if username.is_empty() {
        return Err(AdminValidationError::EmptyUsername);
    }

    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AdminValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("bob").is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(validate_username(""), Err(AdminValidationError::EmptyUsername));
    }

    #[test]
    fn test_username_too_short() {
        assert_eq!(
            validate_username("ab"),
            Err(AdminValidationError::UsernameTooShort(3))
        );
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  admin "), "admin");
        assert_eq!(normalize_username("Admin"), "Admin");
    }
}
