//! Row mapping for the `schools` table
//!
//! [`SchoolRecord`] is the only place where the School aggregate is flattened
//! into columns and rebuilt from them. Empty text and empty locations are
//! stored as NULL; NULL columns come back as the empty value objects. The
//! `*_folded` columns hold lower-cased copies of the text the list filters
//! search, folded here rather than by SQLite's ASCII-only `lower()`.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};

use crate::domain::shared::{Address, Location};
use crate::domain::{DomainError, School, SchoolId};
use crate::infrastructure::storage::errors::corrupt_row;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Column list in bind order
pub(crate) const SCHOOL_COLUMNS: &str = "id, name, unique_key, address_street, address_city, \
     address_state, address_zip_code, location_latitude, location_longitude, location_county, \
     location_region, created_at, updated_at, name_folded, address_city_folded, \
     address_state_folded";

/// Flat representation of a school row
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SchoolRecord {
    pub id: String,
    pub name: String,
    pub unique_key: String,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip_code: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
    pub location_county: Option<String>,
    pub location_region: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name_folded: String,
    pub address_city_folded: String,
    pub address_state_folded: String,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl SchoolRecord {
    pub fn from_school(school: &School) -> Self {
        let address = school.address();
        let location = address.location();
        let has_coordinates = !location.is_empty();

        Self {
            id: school.id().to_string(),
            name: school.name().to_string(),
            unique_key: school.unique_key(),
            address_street: non_empty(address.street()),
            address_city: non_empty(address.city()),
            address_state: non_empty(address.state()),
            address_zip_code: non_empty(address.zip_code()),
            location_latitude: has_coordinates.then(|| location.latitude()),
            location_longitude: has_coordinates.then(|| location.longitude()),
            location_county: non_empty(location.county()),
            location_region: non_empty(location.region()),
            created_at: school.created_at(),
            updated_at: school.updated_at(),
            name_folded: school.name().to_lowercase(),
            address_city_folded: address.city().to_lowercase(),
            address_state_folded: address.state().to_lowercase(),
        }
    }

    pub fn from_row(row: &SqliteRow) -> Result<Self, DomainError> {
        fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, DomainError>
        where
            T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
        {
            row.try_get(column).map_err(|e| corrupt_row("school", e))
        }

        Ok(Self {
            id: get(row, "id")?,
            name: get(row, "name")?,
            unique_key: get(row, "unique_key")?,
            address_street: get(row, "address_street")?,
            address_city: get(row, "address_city")?,
            address_state: get(row, "address_state")?,
            address_zip_code: get(row, "address_zip_code")?,
            location_latitude: get(row, "location_latitude")?,
            location_longitude: get(row, "location_longitude")?,
            location_county: get(row, "location_county")?,
            location_region: get(row, "location_region")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
            name_folded: get(row, "name_folded")?,
            address_city_folded: get(row, "address_city_folded")?,
            address_state_folded: get(row, "address_state_folded")?,
        })
    }

    /// Bind every column, in [`SCHOOL_COLUMNS`] order, as `?1..?16`
    pub fn bind(self, query: SqliteQuery<'_>) -> SqliteQuery<'_> {
        query
            .bind(self.id)
            .bind(self.name)
            .bind(self.unique_key)
            .bind(self.address_street)
            .bind(self.address_city)
            .bind(self.address_state)
            .bind(self.address_zip_code)
            .bind(self.location_latitude)
            .bind(self.location_longitude)
            .bind(self.location_county)
            .bind(self.location_region)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(self.name_folded)
            .bind(self.address_city_folded)
            .bind(self.address_state_folded)
    }

    pub fn into_school(self) -> Result<School, DomainError> {
        let id = SchoolId::parse(&self.id).map_err(|e| corrupt_row("school", e))?;

        let location = Location::new(
            self.location_latitude.unwrap_or(0.0),
            self.location_longitude.unwrap_or(0.0),
            self.location_county.as_deref().unwrap_or_default(),
            self.location_region.as_deref().unwrap_or_default(),
        )
        .map_err(|e| corrupt_row("school", e))?;

        let address = Address::from_parts(
            self.address_street.unwrap_or_default(),
            self.address_city.unwrap_or_default(),
            self.address_state.unwrap_or_default(),
            self.address_zip_code.unwrap_or_default(),
            location,
        );

        Ok(School::restore(
            id,
            self.name,
            address,
            self.created_at,
            self.updated_at,
        ))
    }
}
