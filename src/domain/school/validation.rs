//! School validation utilities

use thiserror::Error;

use crate::domain::DomainError;
use crate::domain::shared::Address;

/// Errors that can occur during school validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchoolValidationError {
    #[error("School name cannot be empty")]
    EmptyName,

    #[error("School address cannot be empty")]
    EmptyAddress,

    #[error("School address must have a city")]
    MissingCity,

    #[error("School address must have a state")]
    MissingState,
}

impl From<SchoolValidationError> for DomainError {
    fn from(err: SchoolValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

pub fn validate_school_name(name: &str) -> Result<(), SchoolValidationError> {
    if name.trim().is_empty() {
        return Err(SchoolValidationError::EmptyName);
    }

    Ok(())
}

/// Validate the address held by a school
///
/// `Address::new` already requires city and state, but an address can also
/// be obtained through `Default` or rebuilt from storage, so the aggregate
/// checks again.
pub fn validate_school_address(address: &Address) -> Result<(), SchoolValidationError> {
    if address.is_empty() {
        return Err(SchoolValidationError::EmptyAddress);
    }

    if address.city().trim().is_empty() {
        return Err(SchoolValidationError::MissingCity);
    }

    if address.state().trim().is_empty() {
        return Err(SchoolValidationError::MissingState);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Location;

    #[test]
    fn test_school_name() {
        assert!(validate_school_name("Lincoln Elementary").is_ok());
        assert_eq!(validate_school_name("   "), Err(SchoolValidationError::EmptyName));
    }

    #[test]
    fn test_empty_address() {
        assert_eq!(
            validate_school_address(&Address::default()),
            Err(SchoolValidationError::EmptyAddress)
        );
    }

    #[test]
    fn test_address_without_city() {
        let address = Address::from_parts(
            "1 Elm".into(),
            String::new(),
            "IL".into(),
            String::new(),
            Location::default(),
        );
        assert_eq!(
            validate_school_address(&address),
            Err(SchoolValidationError::MissingCity)
        );
    }

    #[test]
    fn test_address_without_state() {
        let address = Address::from_parts(
            "1 Elm".into(),
            "Springfield".into(),
            String::new(),
            String::new(),
            Location::default(),
        );
        assert_eq!(
            validate_school_address(&address),
            Err(SchoolValidationError::MissingState)
        );
    }
}
