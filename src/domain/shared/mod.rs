//! Value objects shared by the aggregates

mod address;
mod location;
mod validation;

pub use address::Address;
pub use location::Location;
pub use validation::ValueObjectError;
