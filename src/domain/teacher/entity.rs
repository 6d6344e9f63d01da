//! Teacher aggregate root

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::{StatusEvent, TeacherStatus};
use super::validation::{
    normalize_email, validate_email, validate_wishlist_url, TeacherValidationError,
};
use crate::domain::{DomainError, SchoolId, TeacherId};

/// Teacher registration aggregate root
///
/// Invariants:
/// - email is present, lower-case and well formed
/// - first and last name are present
/// - a school is referenced
/// - a non-empty wishlist URL is an HTTPS Amazon URL
/// - an approved registration has a wishlist URL
///
/// Email uniqueness and the existence of the referenced school are enforced
/// by the repositories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teacher {
    id: TeacherId,
    email: String,
    first_name: String,
    last_name: String,
    school_id: SchoolId,
    grade_level: String,
    wishlist_url: String,
    status: TeacherStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Teacher {
    /// Register a new teacher in `pending` status
    pub fn new(
        email: &str,
        first_name: &str,
        last_name: &str,
        school_id: SchoolId,
        grade_level: &str,
    ) -> Result<Self, TeacherValidationError> {
        let now = Utc::now();

        let teacher = Self {
            id: TeacherId::generate(),
            email: normalize_email(email),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            school_id,
            grade_level: grade_level.trim().to_string(),
            wishlist_url: String::new(),
            status: TeacherStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        teacher.validate_invariants()?;
        Ok(teacher)
    }

    /// Rebuild a teacher from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: TeacherId,
        email: String,
        first_name: String,
        last_name: String,
        school_id: SchoolId,
        grade_level: String,
        wishlist_url: String,
        status: TeacherStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            school_id,
            grade_level,
            wishlist_url,
            status,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &TeacherId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn school_id(&self) -> &SchoolId {
        &self.school_id
    }

    pub fn grade_level(&self) -> &str {
        &self.grade_level
    }

    pub fn wishlist_url(&self) -> &str {
        &self.wishlist_url
    }

    pub fn status(&self) -> TeacherStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Status checks

    pub fn is_pending(&self) -> bool {
        self.status == TeacherStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == TeacherStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.status == TeacherStatus::Rejected
    }

    pub fn has_wishlist(&self) -> bool {
        !self.wishlist_url.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    // Transitions

    /// Move from `pending` to `approved`
    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.apply(StatusEvent::Approve)
    }

    /// Move from `pending` to `rejected`
    pub fn reject(&mut self) -> Result<(), DomainError> {
        self.apply(StatusEvent::Reject)
    }

    fn apply(&mut self, event: StatusEvent) -> Result<(), DomainError> {
        let next = self.status.transition(event, self.has_wishlist())?;

        let mut candidate = self.clone();
        candidate.status = next;
        candidate.validate_invariants()?;
        candidate.touch();

        *self = candidate;
        Ok(())
    }

    // Mutators

    /// Replace the wishlist URL
    ///
    /// Clearing the URL of an approved registration fails. Leaves the
    /// teacher unchanged on failure.
    pub fn update_wishlist_url(&mut self, wishlist_url: &str) -> Result<(), TeacherValidationError> {
        let wishlist_url = wishlist_url.trim();
        validate_wishlist_url(wishlist_url)?;

        let mut candidate = self.clone();
        candidate.wishlist_url = wishlist_url.to_string();
        candidate.validate_invariants()?;
        candidate.touch();

        *self = candidate;
        Ok(())
    }

    /// Replace name and grade level. Leaves the teacher unchanged on failure.
    pub fn update_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
        grade_level: &str,
    ) -> Result<(), TeacherValidationError> {
        let mut candidate = self.clone();
        candidate.first_name = first_name.trim().to_string();
        candidate.last_name = last_name.trim().to_string();
        candidate.grade_level = grade_level.trim().to_string();
        candidate.validate_invariants()?;
        candidate.touch();

        *self = candidate;
        Ok(())
    }

    /// Check every aggregate invariant
    pub fn validate_invariants(&self) -> Result<(), TeacherValidationError> {
        validate_email(&self.email)?;

        if self.first_name.is_empty() {
            return Err(TeacherValidationError::EmptyFirstName);
        }

        if self.last_name.is_empty() {
            return Err(TeacherValidationError::EmptyLastName);
        }

        if self.school_id.is_nil() {
            return Err(TeacherValidationError::MissingSchool);
        }

        validate_wishlist_url(&self.wishlist_url)?;

        if self.is_approved() && !self.has_wishlist() {
            return Err(TeacherValidationError::ApprovedWithoutWishlist);
        }

        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
