//! School infrastructure - in-memory and SQLite repositories

mod in_memory;
mod record;
mod sqlite_repository;

pub use in_memory::InMemorySchoolRepository;
pub use sqlite_repository::SqliteSchoolRepository;
