//! SQLite admin repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::admin::normalize_username;
use crate::domain::pagination::{sql_limit, sql_offset};
use crate::domain::{
    Admin, AdminFilters, AdminId, AdminRepository, DomainError, OpContext, PasswordHasher,
};
use crate::infrastructure::storage::errors::{classify_write_error, corrupt_row, internal_error};
use crate::infrastructure::storage::sqlite::{begin_write, commit_write};

/// SQLite implementation of AdminRepository
pub struct SqliteAdminRepository {
    pool: SqlitePool,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for SqliteAdminRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteAdminRepository")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl SqliteAdminRepository {
    pub fn new(pool: SqlitePool, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { pool, hasher }
    }

    async fn fetch_one(&self, clause: &str, value: String) -> Result<Option<Admin>, DomainError> {
        let sql = format!(
            "SELECT id, username, password_hash, created_at FROM admins WHERE {}",
            clause
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal_error(e, "get admin"))?;

        row.as_ref().map(row_to_admin).transpose()
    }
}

fn duplicate_message(admin: &Admin) -> String {
    format!("Username '{}' already exists", admin.username())
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    fn password_hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    async fn create(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError> {
        admin.validate_invariants()?;

        let mut tx = begin_write(ctx, &self.pool, "create admin").await?;
        ctx.run(async {
            sqlx::query(
                "INSERT INTO admins (id, username, password_hash, created_at, username_folded) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(admin.id().to_string())
            .bind(admin.username())
            .bind(admin.password_hash())
            .bind(admin.created_at())
            .bind(admin.username().to_lowercase())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    "create admin",
                    || duplicate_message(admin),
                    || format!("Admin '{}' references a missing record", admin.id()),
                )
            })
        })
        .await?;
        commit_write(ctx, tx, "create admin").await?;

        debug!(admin_id = %admin.id(), username = admin.username(), "Created admin");
        Ok(())
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &AdminId) -> Result<Admin, DomainError> {
        ctx.run(async {
            self.fetch_one("id = ?1", id.to_string())
                .await?
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
            self.fetch_one("username = ?1", username.clone())
                .await?
                .ok_or_else(|| {
                    DomainError::not_found(format!("Admin '{}' not found", username))
                })
        })
        .await
    }

    async fn update(&self, ctx: &OpContext, admin: &Admin) -> Result<(), DomainError> {
        admin.validate_invariants()?;

        let mut tx = begin_write(ctx, &self.pool, "update admin").await?;
        let result = ctx
            .run(async {
                sqlx::query(
                    "UPDATE admins SET username = ?2, password_hash = ?3, username_folded = ?4 \
                     WHERE id = ?1",
                )
                .bind(admin.id().to_string())
                .bind(admin.username())
                .bind(admin.password_hash())
                .bind(admin.username().to_lowercase())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    classify_write_error(
                        e,
                        "update admin",
                        || duplicate_message(admin),
                        || format!("Admin '{}' references a missing record", admin.id()),
                    )
                })
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Admin '{}' not found",
                admin.id()
            )));
        }

        commit_write(ctx, tx, "update admin").await?;

        debug!(admin_id = %admin.id(), "Updated admin");
        Ok(())
    }

    async fn delete(&self, ctx: &OpContext, id: &AdminId) -> Result<(), DomainError> {
        let mut tx = begin_write(ctx, &self.pool, "delete admin").await?;
        let result = ctx
            .run(async {
                sqlx::query("DELETE FROM admins WHERE id = ?1")
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| internal_error(e, "delete admin"))
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Admin '{}' not found", id)));
        }

        commit_write(ctx, tx, "delete admin").await?;

        debug!(admin_id = %id, "Deleted admin");
        Ok(())
    }

    async fn list(&self, ctx: &OpContext, filters: &AdminFilters) -> Result<Vec<Admin>, DomainError> {
        ctx.run(async {
            let rows = sqlx::query(
                r#"
                SELECT id, username, password_hash, created_at FROM admins
                WHERE (?1 IS NULL OR instr(username_folded, ?1) > 0)
                ORDER BY created_at, id
                LIMIT ?2 OFFSET ?3
                "#,
            )
            .bind(filters.username.as_deref().map(|u| u.trim().to_lowercase()))
            .bind(sql_limit(filters.limit))
            .bind(sql_offset(filters.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal_error(e, "list admins"))?;

            rows.iter().map(row_to_admin).collect()
        })
        .await
    }

    async fn count(&self, ctx: &OpContext) -> Result<usize, DomainError> {
        ctx.run(async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| internal_error(e, "count admins"))?;

            Ok(count as usize)
        })
        .await
    }
}

fn row_to_admin(row: &SqliteRow) -> Result<Admin, DomainError> {
    let id: String = row.try_get("id").map_err(|e| corrupt_row("admin", e))?;
    let username: String = row.try_get("username").map_err(|e| corrupt_row("admin", e))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| corrupt_row("admin", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| corrupt_row("admin", e))?;

    let id = AdminId::parse(&id).map_err(|e| corrupt_row("admin", e))?;

    Ok(Admin::restore(id, username, password_hash, created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::admin::Argon2Hasher;
    use crate::infrastructure::storage::sqlite::{open, SqliteConfig};

    async fn repo() -> SqliteAdminRepository {
        let pool = open(&SqliteConfig::in_memory()).await.unwrap();
        let params = argon2::Params::new(8, 1, 1, None).unwrap();
        SqliteAdminRepository::new(pool, Arc::new(Argon2Hasher::with_params(params)))
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let repo = repo().await;
        let ctx = OpContext::background();
        let admin = Admin::new("operator", "s3cret-pass", repo.password_hasher()).unwrap();

        repo.create(&ctx, &admin).await.unwrap();

        assert_eq!(repo.get_by_id(&ctx, admin.id()).await.unwrap(), admin);
        assert_eq!(repo.get_by_username(&ctx, " operator ").await.unwrap(), admin);
        assert!(repo
            .get_by_username(&ctx, "OPERATOR")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = repo().await;
        let ctx = OpContext::background();
        repo.create(&ctx, &Admin::with_hash("operator", "h1").unwrap())
            .await
            .unwrap();

        let err = repo
            .create(&ctx, &Admin::with_hash(" operator", "h2").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(repo.count(&ctx).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let repo = repo().await;
        let ctx = OpContext::background();
        let admin = Admin::new("operator", "s3cret-pass", repo.password_hasher()).unwrap();
        repo.create(&ctx, &admin).await.unwrap();

        let found = repo
            .validate_credentials(&ctx, "operator", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(found.id(), admin.id());

        assert!(matches!(
            repo.validate_credentials(&ctx, "operator", "wrong").await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            repo.validate_credentials(&ctx, "ghost", "s3cret-pass").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_update_password_and_delete() {
        let repo = repo().await;
        let ctx = OpContext::background();
        let mut admin = Admin::new("operator", "first-pass", repo.password_hasher()).unwrap();
        repo.create(&ctx, &admin).await.unwrap();

        admin
            .update_password("second-pass", repo.password_hasher())
            .unwrap();
        repo.update(&ctx, &admin).await.unwrap();
        assert!(repo
            .validate_credentials(&ctx, "operator", "second-pass")
            .await
            .is_ok());

        repo.delete(&ctx, admin.id()).await.unwrap();
        assert!(repo.delete(&ctx, admin.id()).await.unwrap_err().is_not_found());
        assert!(repo.update(&ctx, &admin).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = repo().await;
        let ctx = OpContext::background();
        for name in ["alice", "bob", "alicia"] {
            repo.create(&ctx, &Admin::with_hash(name, "hash").unwrap())
                .await
                .unwrap();
        }

        let filters = AdminFilters {
            username: Some("ALI".into()),
            ..Default::default()
        };
        assert_eq!(repo.list(&ctx, &filters).await.unwrap().len(), 2);

        let page = AdminFilters {
            limit: Some(2),
            offset: Some(2),
            ..Default::default()
        };
        assert_eq!(repo.list(&ctx, &page).await.unwrap().len(), 1);
        assert!(repo.exists_by_username(&ctx, "bob").await.unwrap());
    }
}
