//! In-memory admin repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::admin::normalize_username;
use crate::domain::pagination::paginate;
use crate::domain::{
    Admin, AdminFilters, AdminId, AdminRepository, DomainError, OpContext, PasswordHasher,
};
use crate::infrastructure::storage::InMemoryStore;

/// In-memory implementation of AdminRepository
#[derive(Debug)]
pub struct InMemoryAdminRepository {
    store: InMemoryStore,
    hasher: Arc<dyn PasswordHasher>,
}

impl InMemoryAdminRepository {
    pub fn new(store: InMemoryStore, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }
}

fn duplicate(admin: &Admin) -> DomainError {
    let message = format!("Username '{}' already exists", admin.username());
    warn!(admin_id = %admin.id(), %message, "Rejected duplicate admin");
    DomainError::duplicate_key(message)
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    fn password_hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    async fn create(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError> {
        admin.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            if state.admins.contains_key(admin.id())
                || state.admin_usernames.contains_key(admin.username())
            {
                return Err(duplicate(admin));
            }

            state
                .admin_usernames
                .insert(admin.username().to_string(), *admin.id());
            state.admins.insert(*admin.id(), admin.clone());

            debug!(admin_id = %admin.id(), username = admin.username(), "Created admin");
            Ok(())
        })
        .await
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &AdminId) -> Result<Admin, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            state
                .admins
                .get(id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Admin '{}' not found", id)))
        })
        .await
    }

    async fn get_by_username(
        &self,
        ctx: &OpContext,
        username: &str,
    ) -> Result<Admin, DomainError> {
        let username = normalize_username(username);

        ctx.run(async {
            let state = self.store.state().read().await;

            state
                .admin_usernames
                .get(&username)
                .and_then(|id| state.admins.get(id))
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Admin '{}' not found", username)))
        })
        .await
    }

    async fn update(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError> {
        admin.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let old_username = match state.admins.get(admin.id()) {
                Some(existing) => existing.username().to_string(),
                None => {
                    return Err(DomainError::not_found(format!(
                        "Admin '{}' not found",
                        admin.id()
                    )));
                }
            };

            if let Some(owner) = state.admin_usernames.get(admin.username()) {
                if owner != admin.id() {
                    return Err(duplicate(admin));
                }
            }

            if old_username != admin.username() {
                state.admin_usernames.remove(&old_username);
                state
                    .admin_usernames
                    .insert(admin.username().to_string(), *admin.id());
            }
            state.admins.insert(*admin.id(), admin.clone());

            debug!(admin_id = %admin.id(), "Updated admin");
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &OpContext, id: &AdminId) -> Result<(), DomainError> {
        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let Some(admin) = state.admins.remove(id) else {
                return Err(DomainError::not_found(format!("Admin '{}' not found", id)));
            };
            state.admin_usernames.remove(admin.username());

            debug!(admin_id = %id, "Deleted admin");
            Ok(())
        })
        .await
    }

    async fn list(&self, ctx: &OpContext, filters: &AdminFilters) -> Result<Vec<Admin>, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            let mut matching: Vec<Admin> = state
                .admins
                .values()
                .filter(|a| filters.matches(a))
                .cloned()
                .collect();
            matching.sort_by_key(|a| (a.created_at(), *a.id()));

            Ok(paginate(matching, filters.offset, filters.limit))
        })
        .await
    }

    async fn count(&self, ctx: &OpContext) -> Result<usize, DomainError> {
        ctx.run(async { Ok(self.store.state().read().await.admins.len()) })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::admin::Argon2Hasher;

    fn repo() -> InMemoryAdminRepository {
        let params = argon2::Params::new(8, 1, 1, None).unwrap();
        InMemoryStore::new().admins(Arc::new(Argon2Hasher::with_params(params)))
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = repo();
        let ctx = OpContext::background();
        let admin = Admin::new("operator", "s3cret-pass", repo.password_hasher()).unwrap();

        repo.create(&ctx, &admin).await.unwrap();

        assert_eq!(repo.get_by_id(&ctx, admin.id()).await.unwrap(), admin);
        assert_eq!(repo.get_by_username(&ctx, "operator ").await.unwrap(), admin);
        assert_eq!(repo.count(&ctx).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let repo = repo();
        let ctx = OpContext::background();
        repo.create(&ctx, &Admin::with_hash("operator", "h").unwrap())
            .await
            .unwrap();

        repo.create(&ctx, &Admin::with_hash("Operator", "h").unwrap())
            .await
            .unwrap();
        let err = repo
            .create(&ctx, &Admin::with_hash("operator", "h").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let repo = repo();
        let ctx = OpContext::background();
        let admin = Admin::new("operator", "s3cret-pass", repo.password_hasher()).unwrap();
        repo.create(&ctx, &admin).await.unwrap();

        assert!(repo
            .validate_credentials(&ctx, "operator", "s3cret-pass")
            .await
            .is_ok());
        assert!(matches!(
            repo.validate_credentials(&ctx, "operator", "nope").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.validate_credentials(&ctx, "nobody", "s3cret-pass").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo();
        let ctx = OpContext::background();
        let mut admin = Admin::new("operator", "first-pass", repo.password_hasher()).unwrap();
        repo.create(&ctx, &admin).await.unwrap();

        admin
            .update_password("second-pass", repo.password_hasher())
            .unwrap();
        repo.update(&ctx, &admin).await.unwrap();
        assert!(repo
            .validate_credentials(&ctx, "operator", "first-pass")
            .await
            .is_err());

        repo.delete(&ctx, admin.id()).await.unwrap();
        assert!(!repo.exists_by_username(&ctx, "operator").await.unwrap());
        assert!(repo.get_by_id(&ctx, admin.id()).await.unwrap_err().is_not_found());
    }
}
