//! Teacher validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::domain::DomainError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// Hosts accepted for donation wishlists
const WISHLIST_HOSTS: [&str; 2] = ["amazon.com", "amzn.to"];

/// Errors that can occur during teacher validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeacherValidationError {
    #[error("Email is required")]
    EmptyEmail,

    #[error("Email format is invalid")]
    InvalidEmail,

    #[error("First name is required")]
    EmptyFirstName,

    #[error("Last name is required")]
    EmptyLastName,

    #[error("School ID is required")]
    MissingSchool,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Wishlist URL must use HTTPS")]
    InsecureUrl,

    #[error("Wishlist URL must be from Amazon")]
    UnsupportedHost,

    #[error("Approved registration must have a wishlist URL")]
    ApprovedWithoutWishlist,
}

impl From<TeacherValidationError> for DomainError {
    fn from(err: TeacherValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Lower-case and trim an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already normalized email address
pub fn validate_email(email: &str) -> Result<(), TeacherValidationError> {
    if email.is_empty() {
        return Err(TeacherValidationError::EmptyEmail);
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(TeacherValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a wishlist URL. An empty URL is accepted.
///
/// Rules:
/// - Absolute URL with a host
/// - HTTPS scheme
/// - Host contains `amazon.com` or `amzn.to`
pub fn validate_wishlist_url(wishlist_url: &str) -> Result<(), TeacherValidationError> {
    if wishlist_url.is_empty() {
        return Ok(());
    }

    let parsed = Url::parse(wishlist_url).map_err(|_| TeacherValidationError::InvalidUrl)?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(TeacherValidationError::InvalidUrl),
    };

    if parsed.scheme() != "https" {
        return Err(TeacherValidationError::InsecureUrl);
    }

    if !WISHLIST_HOSTS.iter().any(|allowed| host.contains(allowed)) {
        return Err(TeacherValidationError::UnsupportedHost);
    }

    Ok(())
}
