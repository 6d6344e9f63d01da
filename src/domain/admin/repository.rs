//! Admin repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Admin;
use super::password::PasswordHasher;
use crate::domain::{AdminId, DomainError, OpContext};

/// Filtering criteria for admin queries
#[derive(Debug, Clone, Default)]
pub struct AdminFilters {
    /// Case-insensitive substring match
    pub username: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AdminFilters {
    pub fn matches(&self, admin: &Admin) -> bool {
        self.username
            .as_ref()
            .map(|u| admin.username().to_lowercase().contains(&u.trim().to_lowercase()))
            .unwrap_or(true)
    }
}

/// Repository trait for admin storage
#[async_trait]
pub trait AdminRepository: Send + Sync + Debug {
    /// Hasher used to check credentials
    fn password_hasher(&self) -> &dyn PasswordHasher;

    /// Persist a new admin, failing with `DuplicateKey` when the username is taken
    async fn create(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError>;

    /// Get an admin by ID, failing with `NotFound` when absent
    async fn get_by_id(&self, ctx: &OpContext, id: &AdminId) -> Result<Admin, DomainError>;

    /// Get an admin by username (trimmed)
    async fn get_by_username(&self, ctx: &OpContext, username: &str)
        -> Result<Admin, DomainError>;

    /// Persist changes to an existing admin
    async fn update(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError>;

    /// Delete an admin
    async fn delete(&self, ctx: &OpContext, id: &AdminId) -> Result<(), DomainError>;

    /// Admins matching the filters, oldest first
    async fn list(&self, ctx: &OpContext, filters: &AdminFilters) -> Result<Vec<Admin>, DomainError>;

    /// Total number of admins
    async fn count(&self, ctx: &OpContext) -> Result<usize, DomainError>;

    /// Check whether a username is taken
    async fn exists_by_username(&self, ctx: &OpContext, username: &str) -> Result<bool, DomainError> {
        match self.get_by_username(ctx, username).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Return the admin when `password` matches
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `DomainError::InvalidCredentials`.
    async fn validate_credentials(
        &self,
        ctx: &OpContext,
        username: &str,
        password: &str,
    ) -> Result<Admin, DomainError> {
        let admin = match self.get_by_username(ctx, username).await {
            Ok(admin) => admin,
            Err(e) if e.is_not_found() => return Err(DomainError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        if !admin.validate_password(password, self.password_hasher()) {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_filter() {
        let admin = Admin::with_hash("Operator", "hash").unwrap();

        assert!(AdminFilters::default().matches(&admin));

        let filters = AdminFilters {
            username: Some(" oper ".into()),
            ..Default::default()
        };
        assert!(filters.matches(&admin));

        let filters = AdminFilters {
            username: Some("root".into()),
            ..Default::default()
        };
        assert!(!filters.matches(&admin));
    }
}
