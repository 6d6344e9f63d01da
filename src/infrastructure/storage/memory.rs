//! Shared in-memory store backing the in-memory repositories

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Admin, AdminId, PasswordHasher, School, SchoolId, Teacher, TeacherId};
use crate::infrastructure::admin::InMemoryAdminRepository;
use crate::infrastructure::school::InMemorySchoolRepository;
use crate::infrastructure::teacher::InMemoryTeacherRepository;

/// Every table and natural-key index, guarded by a single lock
///
/// Index values are the owning aggregate's id. Writers update a primary map
/// and its index together while holding the write lock.
#[derive(Debug, Default)]
pub struct MemoryState {
    pub(crate) schools: HashMap<SchoolId, School>,
    /// School unique key -> id
    pub(crate) school_keys: HashMap<String, SchoolId>,
    pub(crate) teachers: HashMap<TeacherId, Teacher>,
    /// Normalized email -> id
    pub(crate) teacher_emails: HashMap<String, TeacherId>,
    pub(crate) admins: HashMap<AdminId, Admin>,
    /// Username -> id
    pub(crate) admin_usernames: HashMap<String, AdminId>,
}

impl MemoryState {
    pub(crate) fn school_has_teachers(&self, school_id: &SchoolId) -> bool {
        self.teachers.values().any(|t| t.school_id() == school_id)
    }
}

/// Handle to the shared in-memory state
///
/// Cloning the handle shares the state. Repositories created from the same
/// store see each other's writes, which the teacher to school reference
/// check relies on.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> &RwLock<MemoryState> {
        &self.state
    }

    pub fn schools(&self) -> InMemorySchoolRepository {
        InMemorySchoolRepository::new(self.clone())
    }

    pub fn teachers(&self) -> InMemoryTeacherRepository {
        InMemoryTeacherRepository::new(self.clone())
    }

    pub fn admins(&self, hasher: Arc<dyn PasswordHasher>) -> InMemoryAdminRepository {
        InMemoryAdminRepository::new(self.clone(), hasher)
    }
}
