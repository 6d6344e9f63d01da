//! Teacher wishlist registrations - the Teacher aggregate, its status
//! machine and its repository contract

mod entity;
mod repository;
mod status;
mod validation;

pub use entity::Teacher;
pub use repository::{TeacherFilters, TeacherRepository};
pub use status::{StatusEvent, TeacherStatus, TransitionError};
pub use validation::{
    normalize_email, validate_email, validate_wishlist_url, TeacherValidationError,
};
