//! Infrastructure layer - Storage adapters, password hashing and logging

pub mod admin;
pub mod logging;
pub mod school;
pub mod storage;
pub mod teacher;
