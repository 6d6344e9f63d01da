//! Domain layer - Core business logic and entities

pub mod admin;
pub mod context;
pub mod error;
pub mod id;
pub mod pagination;
pub mod school;
pub mod shared;
pub mod teacher;

pub use admin::{Admin, AdminFilters, AdminRepository, AdminValidationError, PasswordHasher};
pub use context::OpContext;
pub use error::{
    is_duplicate_key_error, is_foreign_key_error, is_not_found_error, DomainError, ErrorKind,
};
pub use id::{AdminId, SchoolId, TeacherId};
pub use school::{school_unique_key, School, SchoolFilters, SchoolRepository, SchoolValidationError};
pub use shared::{Address, Location, ValueObjectError};
pub use teacher::{
    StatusEvent, Teacher, TeacherFilters, TeacherRepository, TeacherStatus,
    TeacherValidationError, TransitionError,
};
