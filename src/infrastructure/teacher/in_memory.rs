//! In-memory teacher repository implementation

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::pagination::paginate;
use crate::domain::teacher::normalize_email;
use crate::domain::{
    DomainError, OpContext, SchoolId, Teacher, TeacherFilters, TeacherId, TeacherRepository,
};
use crate::infrastructure::storage::memory::MemoryState;
use crate::infrastructure::storage::InMemoryStore;

/// In-memory implementation of TeacherRepository
///
/// School references are checked against the schools held by the same
/// [`InMemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeacherRepository {
    store: InMemoryStore,
}

impl InMemoryTeacherRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn ensure_school_exists(state: &MemoryState, teacher: &Teacher) -> Result<(), DomainError> {
    if state.schools.contains_key(teacher.school_id()) {
        return Ok(());
    }

    let message = format!("School '{}' does not exist", teacher.school_id());
    warn!(teacher_id = %teacher.id(), %message, "Rejected teacher write");
    Err(DomainError::foreign_key(message))
}

fn duplicate(teacher: &Teacher) -> DomainError {
    let message = format!("Teacher with email '{}' already exists", teacher.email());
    warn!(teacher_id = %teacher.id(), %message, "Rejected duplicate teacher");
    DomainError::duplicate_key(message)
}

#[async_trait]
impl TeacherRepository for InMemoryTeacherRepository {
    async fn create(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError> {
        teacher.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            if state.teachers.contains_key(teacher.id())
                || state.teacher_emails.contains_key(teacher.email())
            {
                return Err(duplicate(teacher));
            }

            ensure_school_exists(&state, teacher)?;

            state
                .teacher_emails
                .insert(teacher.email().to_string(), *teacher.id());
            state.teachers.insert(*teacher.id(), teacher.clone());

            debug!(teacher_id = %teacher.id(), school_id = %teacher.school_id(), "Created teacher");
            Ok(())
        })
        .await
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &TeacherId) -> Result<Teacher, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            state
                .teachers
                .get(id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Teacher '{}' not found", id)))
        })
        .await
    }

    async fn get_by_email(&self, ctx: &OpContext, email: &str) -> Result<Teacher, DomainError> {
        let email = normalize_email(email);

        ctx.run(async {
            let state = self.store.state().read().await;

            state
                .teacher_emails
                .get(&email)
                .and_then(|id| state.teachers.get(id))
                .cloned()
                .ok_or_else(|| {
                    DomainError::not_found(format!("Teacher with email '{}' not found", email))
                })
        })
        .await
    }

    async fn update(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError> {
        teacher.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let old_email = match state.teachers.get(teacher.id()) {
                Some(existing) => existing.email().to_string(),
                None => {
                    return Err(DomainError::not_found(format!(
                        "Teacher '{}' not found",
                        teacher.id()
                    )));
                }
            };

            if let Some(owner) = state.teacher_emails.get(teacher.email()) {
                if owner != teacher.id() {
                    return Err(duplicate(teacher));
                }
            }

            ensure_school_exists(&state, teacher)?;

            if old_email != teacher.email() {
                state.teacher_emails.remove(&old_email);
                state
                    .teacher_emails
                    .insert(teacher.email().to_string(), *teacher.id());
            }
            state.teachers.insert(*teacher.id(), teacher.clone());

            debug!(teacher_id = %teacher.id(), status = %teacher.status(), "Updated teacher");
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &OpContext, id: &TeacherId) -> Result<(), DomainError> {
        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let Some(teacher) = state.teachers.remove(id) else {
                return Err(DomainError::not_found(format!("Teacher '{}' not found", id)));
            };
            state.teacher_emails.remove(teacher.email());

            debug!(teacher_id = %id, "Deleted teacher");
            Ok(())
        })
        .await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filters: &TeacherFilters,
    ) -> Result<Vec<Teacher>, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            let mut matching: Vec<Teacher> = state
                .teachers
                .values()
                .filter(|t| filters.matches(t))
                .cloned()
                .collect();
            matching.sort_by_key(|t| (t.created_at(), *t.id()));

            Ok(paginate(matching, filters.offset, filters.limit))
        })
        .await
    }

    async fn count_by_school(
        &self,
        ctx: &OpContext,
        school_id: &SchoolId,
    ) -> Result<usize, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            Ok(state
                .teachers
                .values()
                .filter(|t| t.school_id() == school_id)
                .count())
        })
        .await
    }
}
