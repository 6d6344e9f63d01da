//! School aggregate root

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::{validate_school_address, validate_school_name, SchoolValidationError};
use crate::domain::SchoolId;
use crate::domain::shared::Address;

/// Normalized `name|city|state` key used to detect duplicate schools
pub fn school_unique_key(name: &str, city: &str, state: &str) -> String {
    format!(
        "{}|{}|{}",
        name.trim().to_lowercase(),
        city.trim().to_lowercase(),
        state.trim().to_lowercase()
    )
}

/// School aggregate root
///
/// Invariants:
/// - name is non-empty after trimming
/// - address is non-empty and has a city and a state
///
/// Uniqueness of `(name, city, state)` across schools is enforced by the
/// repositories through [`School::unique_key`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    id: SchoolId,
    name: String,
    address: Address,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl School {
    /// Create a new school with a generated identity
    pub fn new(name: &str, address: Address) -> Result<Self, SchoolValidationError> {
        let now = Utc::now();

        let school = Self {
            id: SchoolId::generate(),
            name: name.trim().to_string(),
            address,
            created_at: now,
            updated_at: now,
        };

        school.validate_invariants()?;
        Ok(school)
    }

    /// Rebuild a school from persisted state
    pub fn restore(
        id: SchoolId,
        name: String,
        address: Address,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            address,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &SchoolId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Rename the school. Leaves the school unchanged on failure.
    pub fn update_name(&mut self, name: &str) -> Result<(), SchoolValidationError> {
        let name = name.trim();
        validate_school_name(name)?;
        validate_school_address(&self.address)?;

        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Replace the address. Leaves the school unchanged on failure.
    pub fn update_address(&mut self, address: Address) -> Result<(), SchoolValidationError> {
        validate_school_name(&self.name)?;
        validate_school_address(&address)?;

        self.address = address;
        self.touch();
        Ok(())
    }

    /// Check every aggregate invariant
    pub fn validate_invariants(&self) -> Result<(), SchoolValidationError> {
        validate_school_name(&self.name)?;
        validate_school_address(&self.address)
    }

    /// Normalized `name|city|state` of this school
    pub fn unique_key(&self) -> String {
        school_unique_key(&self.name, self.address.city(), self.address.state())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for School {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.name,
            self.address.city(),
            self.address.state()
        )
    }
}
