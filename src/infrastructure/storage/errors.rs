//! Translation of sqlx failures into domain errors

use sqlx::error::ErrorKind as SqlErrorKind;
use tracing::{error, warn};

use crate::domain::DomainError;

/// Map a failed write onto the domain taxonomy
///
/// Constraint violations are identified by the driver's structured error
/// kind. `duplicate` and `missing_reference` build the messages reported to
/// callers; everything else becomes `Internal`.
pub fn classify_write_error(
    err: sqlx::Error,
    operation: &str,
    duplicate: impl FnOnce() -> String,
    missing_reference: impl FnOnce() -> String,
) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            SqlErrorKind::UniqueViolation => {
                let message = duplicate();
                warn!(operation, constraint = ?db.constraint(), %message, "Unique constraint rejected write");
                return DomainError::duplicate_key(message);
            }
            SqlErrorKind::ForeignKeyViolation => {
                let message = missing_reference();
                warn!(operation, %message, "Foreign key constraint rejected write");
                return DomainError::foreign_key(message);
            }
            _ => {}
        }
    }

    internal_error(err, operation)
}

/// Map an unexpected driver failure onto `Internal`
pub fn internal_error(err: sqlx::Error, operation: &str) -> DomainError {
    error!(operation, error = %err, "Storage operation failed");
    DomainError::internal(format!("Failed to {}: {}", operation, err))
}

/// Map a row that cannot be decoded onto `Internal`
pub fn corrupt_row(entity: &str, detail: impl std::fmt::Display) -> DomainError {
    error!(entity, %detail, "Corrupt row in storage");
    DomainError::internal(format!("Corrupt {} row: {}", entity, detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::sqlite::{open, SqliteConfig};

    async fn pool() -> sqlx::SqlitePool {
        let pool = open(&SqliteConfig::in_memory()).await.unwrap();
        sqlx::query("CREATE TABLE parent (id TEXT PRIMARY KEY, code TEXT UNIQUE)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE child (id TEXT PRIMARY KEY, parent_id TEXT REFERENCES parent(id))")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_unique_violation_is_duplicate_key() {
        let pool = pool().await;
        sqlx::query("INSERT INTO parent VALUES ('a', 'x')")
            .execute(&pool)
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO parent VALUES ('b', 'x')")
            .execute(&pool)
            .await
            .unwrap_err();

        let mapped = classify_write_error(err, "insert parent", || "dup".into(), || "fk".into());
        assert!(mapped.is_duplicate_key());
        assert_eq!(mapped.to_string(), "Duplicate key: dup");
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_foreign_key() {
        let pool = pool().await;

        let err = sqlx::query("INSERT INTO child VALUES ('c', 'missing')")
            .execute(&pool)
            .await
            .unwrap_err();

        let mapped = classify_write_error(err, "insert child", || "dup".into(), || "fk".into());
        assert!(mapped.is_foreign_key());
    }

    #[tokio::test]
    async fn test_other_failures_are_internal() {
        let pool = pool().await;

        let err = sqlx::query("INSERT INTO nowhere VALUES (1)")
            .execute(&pool)
            .await
            .unwrap_err();

        let mapped = classify_write_error(err, "insert", || "dup".into(), || "fk".into());
        assert_eq!(mapped.kind(), Some(crate::domain::ErrorKind::Internal));
    }
}
