//! School directory - the School aggregate and its repository contract

mod entity;
mod repository;
mod validation;

pub use entity::{school_unique_key, School};
pub use repository::{SchoolFilters, SchoolRepository};
pub use validation::SchoolValidationError;
