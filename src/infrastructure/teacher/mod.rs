//! Teacher infrastructure - in-memory and SQLite repositories

mod in_memory;
mod sqlite_repository;

pub use in_memory::InMemoryTeacherRepository;
pub use sqlite_repository::SqliteTeacherRepository;
