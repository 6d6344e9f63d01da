//! Operator accounts - the Admin aggregate, the password hashing contract
//! and the admin repository contract

mod entity;
mod password;
mod repository;
mod validation;

pub use entity::Admin;
pub use password::PasswordHasher;
pub use repository::{AdminFilters, AdminRepository};
pub use validation::{normalize_username, validate_username, AdminValidationError};
