//! Geographic location value object

use serde::Serialize;

use super::ValueObjectError;

const COORDINATE_TOLERANCE: f64 = 1e-6;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinates plus county and region
///
/// Immutable: the `with_*` methods build and validate a new instance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    county: String,
    region: String,
}

impl Location {
    /// Create a validated location. County and region are trimmed.
    pub fn new(
        latitude: f64,
        longitude: f64,
        county: &str,
        region: &str,
    ) -> Result<Self, ValueObjectError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValueObjectError::LatitudeOutOfRange(latitude));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValueObjectError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
            county: county.trim().to_string(),
            region: region.trim().to_string(),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn with_coordinates(&self, latitude: f64, longitude: f64) -> Result<Self, ValueObjectError> {
        Self::new(latitude, longitude, &self.county, &self.region)
    }

    pub fn with_county(&self, county: &str) -> Result<Self, ValueObjectError> {
        Self::new(self.latitude, self.longitude, county, &self.region)
    }

    pub fn with_region(&self, region: &str) -> Result<Self, ValueObjectError> {
        Self::new(self.latitude, self.longitude, &self.county, region)
    }

    /// True when no coordinate data is present
    pub fn is_empty(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Great-circle distance in kilometers (haversine)
    pub fn distance_to(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < COORDINATE_TOLERANCE
            && (self.longitude - other.longitude).abs() < COORDINATE_TOLERANCE
            && self.county == other.county
            && self.region == other.region
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if !self.is_empty() {
            parts.push(format!("{:.6}, {:.6}", self.latitude, self.longitude));
        }

        if !self.county.is_empty() {
            parts.push(format!("{} County", self.county));
        }

        if !self.region.is_empty() {
            parts.push(self.region.clone());
        }

        write!(f, "{}", parts.join(" - "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_york() -> Location {
        Location::new(40.7128, -74.0060, "NY", "Northeast").unwrap()
    }

    #[test]
    fn test_valid_location() {
        let loc = new_york();
        assert_eq!(loc.latitude(), 40.7128);
        assert_eq!(loc.longitude(), -74.0060);
        assert_eq!(loc.county(), "NY");
        assert_eq!(loc.region(), "Northeast");
        assert!(!loc.is_empty());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_eq!(
            Location::new(91.0, 0.0, "", ""),
            Err(ValueObjectError::LatitudeOutOfRange(91.0))
        );
        assert!(Location::new(-90.5, 0.0, "", "").is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert_eq!(
            Location::new(0.0, 180.5, "", ""),
            Err(ValueObjectError::LongitudeOutOfRange(180.5))
        );
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert!(Location::new(90.0, 180.0, "", "").is_ok());
        assert!(Location::new(-90.0, -180.0, "", "").is_ok());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Location::new(f64::NAN, 0.0, "", "").is_err());
        assert!(Location::new(0.0, f64::INFINITY, "", "").is_err());
    }

    #[test]
    fn test_trims_text() {
        let loc = Location::new(1.0, 1.0, "  Cook ", " Midwest ").unwrap();
        assert_eq!(loc.county(), "Cook");
        assert_eq!(loc.region(), "Midwest");
    }

    #[test]
    fn test_is_empty() {
        assert!(Location::new(0.0, 0.0, "Somewhere", "").unwrap().is_empty());
        assert!(!Location::new(0.0, 1.0, "", "").unwrap().is_empty());
        assert!(Location::default().is_empty());
    }

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let original = new_york();

        let moved = original.with_coordinates(41.0, -73.0).unwrap();
        assert_eq!(moved.latitude(), 41.0);
        assert_eq!(original.latitude(), 40.7128);

        let recounty = original.with_county("Kings").unwrap();
        assert_eq!(recounty.county(), "Kings");
        assert_eq!(original.county(), "NY");

        let reregion = original.with_region("East").unwrap();
        assert_eq!(reregion.region(), "East");
        assert_eq!(original.region(), "Northeast");

        assert!(original.with_coordinates(100.0, 0.0).is_err());
    }

    #[test]
    fn test_equality_tolerance() {
        let a = Location::new(40.7128, -74.0060, "NY", "Northeast").unwrap();
        let b = Location::new(40.71280001, -74.00600001, "NY", "Northeast").unwrap();
        let c = Location::new(40.7129, -74.0060, "NY", "Northeast").unwrap();
        let d = Location::new(40.7128, -74.0060, "ny", "Northeast").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_distance() {
        let ny = new_york();
        let la = Location::new(34.0522, -118.2437, "", "").unwrap();

        let distance = ny.distance_to(&la);
        assert!((distance - 3935.7).abs() < 5.0, "distance was {distance}");
        assert!(ny.distance_to(&ny).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            new_york().to_string(),
            "40.712800, -74.006000 - NY County - Northeast"
        );
        assert_eq!(Location::default().to_string(), "");
    }
}
