//! Admin infrastructure
//!
//! Argon2 password hashing and the in-memory and SQLite admin repositories.

mod in_memory;
mod password;
mod sqlite_repository;

pub use in_memory::InMemoryAdminRepository;
pub use password::Argon2Hasher;
pub use sqlite_repository::SqliteAdminRepository;
