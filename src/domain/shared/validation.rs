//! Value object validation errors

use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised while constructing a value object
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueObjectError {
    #[error("Latitude must be between -90 and 90 degrees, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180 degrees, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("City is required")]
    CityRequired,

    #[error("State is required")]
    StateRequired,

    #[error("State must be a 2-letter code")]
    InvalidStateCode,

    #[error("Zip code must be in format 12345 or 12345-6789")]
    InvalidZipCode,
}

impl From<ValueObjectError> for DomainError {
    fn from(err: ValueObjectError) -> Self {
        DomainError::validation(err.to_string())
    }
}
