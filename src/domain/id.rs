//! Generated identities for aggregate roots

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identity
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// The nil identity marks a missing reference
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Parse an identity from its hyphenated string form
            pub fn parse(value: &str) -> Result<Self, DomainError> {
                let value = value.trim();

                if value.is_empty() {
                    return Err(DomainError::validation(concat!($label, " ID is required")));
                }

                Uuid::parse_str(value).map(Self).map_err(|_| {
                    DomainError::validation(format!(concat!("Invalid ", $label, " ID '{}'"), value))
                })
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// School identifier
    SchoolId,
    "school"
);

entity_id!(
    /// Teacher registration identifier
    TeacherId,
    "teacher"
);

entity_id!(
    /// Admin identifier
    AdminId,
    "admin"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SchoolId::generate(), SchoolId::generate());
    }

    #[test]
    fn test_parse_round_trip() {
        let id = TeacherId::generate();
        let parsed: TeacherId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_empty() {
        let err = SchoolId::parse("  ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: school ID is required");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(AdminId::parse("not-a-uuid").unwrap_err().is_validation());
    }

    #[test]
    fn test_nil() {
        assert!(SchoolId::from_uuid(Uuid::nil()).is_nil());
        assert!(!SchoolId::generate().is_nil());
    }
}
