//! Postal address value object

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{Location, ValueObjectError};

static ZIP_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip code pattern is valid"));

/// A physical address with an embedded [`Location`]
///
/// Immutable: the `with_*` methods build and validate a new instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    street: String,
    city: String,
    state: String,
    zip_code: String,
    location: Location,
}

impl Address {
    /// Create a validated address. Text fields are trimmed.
    ///
    /// Rules:
    /// - City and state are required
    /// - State is a 2-letter code
    /// - Zip code, when present, is `12345` or `12345-6789`
    pub fn new(
        street: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        location: Location,
    ) -> Result<Self, ValueObjectError> {
        let address = Self {
            street: street.trim().to_string(),
            city: city.trim().to_string(),
            state: state.trim().to_string(),
            zip_code: zip_code.trim().to_string(),
            location,
        };

        address.validate()?;
        Ok(address)
    }

    /// Rebuild an address from persisted parts without re-running validation
    pub(crate) fn from_parts(
        street: String,
        city: String,
        state: String,
        zip_code: String,
        location: Location,
    ) -> Self {
        Self {
            street,
            city,
            state,
            zip_code,
            location,
        }
    }

    fn validate(&self) -> Result<(), ValueObjectError> {
        if self.city.is_empty() {
            return Err(ValueObjectError::CityRequired);
        }

        if self.state.is_empty() {
            return Err(ValueObjectError::StateRequired);
        }

        if self.state.chars().count() != 2 {
            return Err(ValueObjectError::InvalidStateCode);
        }

        if !self.zip_code.is_empty() && !ZIP_CODE_REGEX.is_match(&self.zip_code) {
            return Err(ValueObjectError::InvalidZipCode);
        }

        Ok(())
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn with_street(&self, street: &str) -> Result<Self, ValueObjectError> {
        Self::new(street, &self.city, &self.state, &self.zip_code, self.location.clone())
    }

    pub fn with_city(&self, city: &str) -> Result<Self, ValueObjectError> {
        Self::new(&self.street, city, &self.state, &self.zip_code, self.location.clone())
    }

    pub fn with_state(&self, state: &str) -> Result<Self, ValueObjectError> {
        Self::new(&self.street, &self.city, state, &self.zip_code, self.location.clone())
    }

    pub fn with_zip_code(&self, zip_code: &str) -> Result<Self, ValueObjectError> {
        Self::new(&self.street, &self.city, &self.state, zip_code, self.location.clone())
    }

    pub fn with_location(&self, location: Location) -> Result<Self, ValueObjectError> {
        Self::new(&self.street, &self.city, &self.state, &self.zip_code, location)
    }

    /// True when street, city, state and zip are all empty
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zip_code.is_empty()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if !self.street.is_empty() {
            parts.push(self.street.clone());
        }

        let city_state = format!("{} {}", self.city, self.state).trim().to_string();
        if !city_state.is_empty() {
            parts.push(city_state);
        }

        if !self.zip_code.is_empty() {
            parts.push(self.zip_code.clone());
        }

        write!(f, "{}", parts.join(", "))
    }
}
