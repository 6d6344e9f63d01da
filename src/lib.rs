//! School Registry
//!
//! Domain model and storage for a school directory with:
//! - Schools with validated addresses and geographic locations
//! - Teacher wishlist registrations with an approval lifecycle
//! - Operator accounts with Argon2 password hashing
//! - Interchangeable SQLite and in-memory repositories

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use infrastructure::storage::{Registry, RegistryFactory, StorageConfig};
