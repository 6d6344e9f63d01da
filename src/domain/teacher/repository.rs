//! Teacher repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Teacher;
use super::status::TeacherStatus;
use super::validation::normalize_email;
use crate::domain::{DomainError, OpContext, SchoolId, TeacherId};

/// Filtering criteria for teacher queries
#[derive(Debug, Clone, Default)]
pub struct TeacherFilters {
    pub status: Option<TeacherStatus>,
    pub school_id: Option<SchoolId>,
    /// Case-insensitive exact match
    pub grade_level: Option<String>,
    /// Normalized before matching
    pub email: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TeacherFilters {
    pub fn with_status(status: TeacherStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_school(school_id: SchoolId) -> Self {
        Self {
            school_id: Some(school_id),
            ..Default::default()
        }
    }

    /// Check the filters against a teacher
    pub fn matches(&self, teacher: &Teacher) -> bool {
        if let Some(status) = self.status {
            if teacher.status() != status {
                return false;
            }
        }

        if let Some(school_id) = &self.school_id {
            if teacher.school_id() != school_id {
                return false;
            }
        }

        if let Some(grade) = &self.grade_level {
            if teacher.grade_level().to_lowercase() != grade.trim().to_lowercase() {
                return false;
            }
        }

        if let Some(email) = &self.email {
            if teacher.email() != normalize_email(email) {
                return false;
            }
        }

        true
    }
}

/// Repository trait for teacher registrations
///
/// Implementations enforce email uniqueness and require the referenced
/// school to exist.
#[async_trait]
pub trait TeacherRepository: Send + Sync + Debug {
    /// Persist a new registration
    ///
    /// Fails with `Validation` before any I/O, `DuplicateKey` when the email
    /// is taken, `ForeignKey` when the school does not exist.
    async fn create(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError>;

    /// Get a registration by ID, failing with `NotFound` when absent
    async fn get_by_id(&self, ctx: &OpContext, id: &TeacherId) -> Result<Teacher, DomainError>;

    /// Get a registration by email (trimmed, case-insensitive)
    async fn get_by_email(&self, ctx: &OpContext, email: &str) -> Result<Teacher, DomainError>;

    /// Persist changes to an existing registration
    async fn update(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError>;

    /// Delete a registration
    async fn delete(&self, ctx: &OpContext, id: &TeacherId) -> Result<(), DomainError>;

    /// Registrations matching the filters, oldest first
    async fn list(&self, ctx: &OpContext, filters: &TeacherFilters)
        -> Result<Vec<Teacher>, DomainError>;

    /// Approved registrations with a wishlist, for donor search
    async fn get_active_teachers(&self, ctx: &OpContext) -> Result<Vec<Teacher>, DomainError> {
        let approved = self
            .list(ctx, &TeacherFilters::with_status(TeacherStatus::Approved))
            .await?;

        Ok(approved.into_iter().filter(|t| t.has_wishlist()).collect())
    }

    /// Pending registrations awaiting admin review
    async fn get_pending_teachers(&self, ctx: &OpContext) -> Result<Vec<Teacher>, DomainError> {
        self.list(ctx, &TeacherFilters::with_status(TeacherStatus::Pending))
            .await
    }

    /// Number of registrations referencing a school
    async fn count_by_school(&self, ctx: &OpContext, school_id: &SchoolId)
        -> Result<usize, DomainError>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, ctx: &OpContext, email: &str) -> Result<bool, DomainError> {
        match self.get_by_email(ctx, email).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(school_id: SchoolId, grade: &str) -> Teacher {
        Teacher::new("jane@school.org", "Jane", "Doe", school_id, grade).unwrap()
    }

    #[test]
    fn test_filters() {
        let school = SchoolId::generate();
        let jane = teacher(school, "3rd");

        assert!(TeacherFilters::default().matches(&jane));
        assert!(TeacherFilters::with_school(school).matches(&jane));
        assert!(!TeacherFilters::with_school(SchoolId::generate()).matches(&jane));
        assert!(TeacherFilters::with_status(TeacherStatus::Pending).matches(&jane));
        assert!(!TeacherFilters::with_status(TeacherStatus::Approved).matches(&jane));

        let by_grade = TeacherFilters {
            grade_level: Some(" 3RD ".into()),
            ..Default::default()
        };
        assert!(by_grade.matches(&jane));

        let by_email = TeacherFilters {
            email: Some("JANE@school.org".into()),
            ..Default::default()
        };
        assert!(by_email.matches(&jane));
    }
}
