//! School repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::School;
use crate::domain::{DomainError, OpContext, SchoolId};

/// Filtering criteria for school queries
///
/// Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct SchoolFilters {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SchoolFilters {
    /// Check the text filters against a school
    pub fn matches(&self, school: &School) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
                .unwrap_or(true)
        }

        contains(school.name(), &self.name)
            && contains(school.address().city(), &self.city)
            && contains(school.address().state(), &self.state)
    }
}

/// Repository trait for school storage
///
/// Implementations enforce uniqueness of [`School::unique_key`] and refuse to
/// delete a school that registrations still reference.
#[async_trait]
pub trait SchoolRepository: Send + Sync + Debug {
    /// Persist a new school
    ///
    /// Fails with `Validation` before any I/O, `DuplicateKey` when another
    /// school has the same normalized name, city and state.
    async fn create(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError>;

    /// Get a school by ID, failing with `NotFound` when absent
    async fn get_by_id(&self, ctx: &OpContext, id: &SchoolId) -> Result<School, DomainError>;

    /// Get a school by its natural key, normalized like [`School::unique_key`]
    async fn get_by_name_city_state(
        &self,
        ctx: &OpContext,
        name: &str,
        city: &str,
        state: &str,
    ) -> Result<School, DomainError>;

    /// Persist changes to an existing school
    async fn update(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError>;

    /// Delete a school, failing with `ForeignKey` while teachers reference it
    async fn delete(&self, ctx: &OpContext, id: &SchoolId) -> Result<(), DomainError>;

    /// All schools ordered by name, city and state
    async fn get_all(&self, ctx: &OpContext) -> Result<Vec<School>, DomainError>;

    /// Schools matching the filters, ordered like `get_all`
    async fn list(&self, ctx: &OpContext, filters: &SchoolFilters)
        -> Result<Vec<School>, DomainError>;

    /// Case-insensitive search across name, city and state
    async fn search(
        &self,
        ctx: &OpContext,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<School>, DomainError>;

    /// Check whether a school with this natural key exists
    async fn exists_by_name_city_state(
        &self,
        ctx: &OpContext,
        name: &str,
        city: &str,
        state: &str,
    ) -> Result<bool, DomainError> {
        match self.get_by_name_city_state(ctx, name, city, state).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Address, Location};

    fn school(name: &str, city: &str, state: &str) -> School {
        let address = Address::new("", city, state, "", Location::default()).unwrap();
        School::new(name, address).unwrap()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(SchoolFilters::default().matches(&school("Lincoln", "Chicago", "IL")));
    }

    #[test]
    fn test_filters_are_case_insensitive_substrings() {
        let lincoln = school("Lincoln Elementary", "Chicago", "IL");

        let filters = SchoolFilters {
            name: Some("LINCOLN".into()),
            city: Some("cago".into()),
            ..Default::default()
        };
        assert!(filters.matches(&lincoln));

        let filters = SchoolFilters {
            state: Some("ny".into()),
            ..Default::default()
        };
        assert!(!filters.matches(&lincoln));
    }
}
