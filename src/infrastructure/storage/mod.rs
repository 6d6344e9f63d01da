//! Storage infrastructure - backends and repository wiring

pub mod errors;
mod factory;
pub mod memory;
pub mod sqlite;

pub use factory::{Registry, RegistryFactory, StorageConfig, StorageType};
pub use memory::InMemoryStore;
pub use sqlite::SqliteConfig;
