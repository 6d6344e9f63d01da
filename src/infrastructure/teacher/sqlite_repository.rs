//! SQLite teacher repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::pagination::{sql_limit, sql_offset};
use crate::domain::teacher::normalize_email;
use crate::domain::{
    DomainError, OpContext, SchoolId, Teacher, TeacherFilters, TeacherId, TeacherRepository,
    TeacherStatus,
};
use crate::infrastructure::storage::errors::{classify_write_error, corrupt_row, internal_error};
use crate::infrastructure::storage::sqlite::{begin_write, commit_write};

const TEACHER_COLUMNS: &str = "id, email, first_name, last_name, school_id, grade_level, \
     wishlist_url, status, created_at, updated_at";

/// SQLite implementation of TeacherRepository
///
/// Email uniqueness and the school reference are enforced by the
/// `teachers.email` UNIQUE constraint and the `school_id` foreign key.
#[derive(Debug, Clone)]
pub struct SqliteTeacherRepository {
    pool: SqlitePool,
}

impl SqliteTeacherRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn duplicate_message(teacher: &Teacher) -> String {
    format!("Teacher with email '{}' already exists", teacher.email())
}

fn missing_school_message(teacher: &Teacher) -> String {
    format!("School '{}' does not exist", teacher.school_id())
}

#[async_trait]
impl TeacherRepository for SqliteTeacherRepository {
    async fn create(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError> {
        teacher.validate_invariants()?;

        let sql = format!(
            "INSERT INTO teachers ({}, grade_level_folded) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            TEACHER_COLUMNS
        );

        let mut tx = begin_write(ctx, &self.pool, "create teacher").await?;
        ctx.run(async {
            sqlx::query(&sql)
                .bind(teacher.id().to_string())
                .bind(teacher.email())
                .bind(teacher.first_name())
                .bind(teacher.last_name())
                .bind(teacher.school_id().to_string())
                .bind(teacher.grade_level())
                .bind(teacher.wishlist_url())
                .bind(teacher.status().as_str())
                .bind(teacher.created_at())
                .bind(teacher.updated_at())
                .bind(teacher.grade_level().to_lowercase())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    classify_write_error(
                        e,
                        "create teacher",
                        || duplicate_message(teacher),
                        || missing_school_message(teacher),
                    )
                })
        })
        .await?;
        commit_write(ctx, tx, "create teacher").await?;

        debug!(teacher_id = %teacher.id(), school_id = %teacher.school_id(), "Created teacher");
        Ok(())
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &TeacherId) -> Result<Teacher, DomainError> {
        ctx.run(async {
            let sql = format!("SELECT {} FROM teachers WHERE id = ?1", TEACHER_COLUMNS);

            let row = sqlx::query(&sql)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| internal_error(e, "get teacher"))?;

            match row {
                Some(row) => row_to_teacher(&row),
                None => Err(DomainError::not_found(format!("Teacher '{}' not found", id))),
            }
        })
        .await
    }

    async fn get_by_email(&self, ctx: &OpContext, email: &str) -> Result<Teacher, DomainError> {
        let email = normalize_email(email);

        ctx.run(async {
            let sql = format!("SELECT {} FROM teachers WHERE email = ?1", TEACHER_COLUMNS);

            let row = sqlx::query(&sql)
                .bind(&email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| internal_error(e, "get teacher by email"))?;

            match row {
                Some(row) => row_to_teacher(&row),
                None => Err(DomainError::not_found(format!(
                    "Teacher with email '{}' not found",
                    email
                ))),
            }
        })
        .await
    }

    async fn update(&self, ctx: &OpContext, teacher: &Teacher) -> Result<(), DomainError> {
        teacher.validate_invariants()?;

        let mut tx = begin_write(ctx, &self.pool, "update teacher").await?;
        let result = ctx
            .run(async {
                sqlx::query(
                    r#"
                    UPDATE teachers
                    SET email = ?2, first_name = ?3, last_name = ?4, school_id = ?5,
                        grade_level = ?6, wishlist_url = ?7, status = ?8, updated_at = ?9,
                        grade_level_folded = ?10
                    WHERE id = ?1
                    "#,
                )
                .bind(teacher.id().to_string())
                .bind(teacher.email())
                .bind(teacher.first_name())
                .bind(teacher.last_name())
                .bind(teacher.school_id().to_string())
                .bind(teacher.grade_level())
                .bind(teacher.wishlist_url())
                .bind(teacher.status().as_str())
                .bind(teacher.updated_at())
                .bind(teacher.grade_level().to_lowercase())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    classify_write_error(
                        e,
                        "update teacher",
                        || duplicate_message(teacher),
                        || missing_school_message(teacher),
                    )
                })
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Teacher '{}' not found",
                teacher.id()
            )));
        }

        commit_write(ctx, tx, "update teacher").await?;

        debug!(teacher_id = %teacher.id(), status = %teacher.status(), "Updated teacher");
        Ok(())
    }

    async fn delete(&self, ctx: &OpContext, id: &TeacherId) -> Result<(), DomainError> {
        let mut tx = begin_write(ctx, &self.pool, "delete teacher").await?;
        let result = ctx
            .run(async {
                sqlx::query("DELETE FROM teachers WHERE id = ?1")
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| internal_error(e, "delete teacher"))
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Teacher '{}' not found", id)));
        }

        commit_write(ctx, tx, "delete teacher").await?;

        debug!(teacher_id = %id, "Deleted teacher");
        Ok(())
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filters: &TeacherFilters,
    ) -> Result<Vec<Teacher>, DomainError> {
        ctx.run(async {
            let sql = format!(
                r#"
                SELECT {} FROM teachers
                WHERE (?1 IS NULL OR status = ?1)
                  AND (?2 IS NULL OR school_id = ?2)
                  AND (?3 IS NULL OR grade_level_folded = ?3)
                  AND (?4 IS NULL OR email = ?4)
                ORDER BY created_at, id
                LIMIT ?5 OFFSET ?6
                "#,
                TEACHER_COLUMNS
            );

            let rows = sqlx::query(&sql)
                .bind(filters.status.map(|s| s.as_str()))
                .bind(filters.school_id.map(|id| id.to_string()))
                .bind(filters.grade_level.as_deref().map(|g| g.trim().to_lowercase()))
                .bind(filters.email.as_deref().map(normalize_email))
                .bind(sql_limit(filters.limit))
                .bind(sql_offset(filters.offset))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| internal_error(e, "list teachers"))?;

            rows.iter().map(row_to_teacher).collect()
        })
        .await
    }

    async fn count_by_school(
        &self,
        ctx: &OpContext,
        school_id: &SchoolId,
    ) -> Result<usize, DomainError> {
        ctx.run(async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE school_id = ?1")
                .bind(school_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| internal_error(e, "count teachers"))?;

            Ok(count as usize)
        })
        .await
    }
}

fn row_to_teacher(row: &SqliteRow) -> Result<Teacher, DomainError> {
    fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, DomainError>
    where
        T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        row.try_get(column).map_err(|e| corrupt_row("teacher", e))
    }

    let id: String = get(row, "id")?;
    let school_id: String = get(row, "school_id")?;
    let status: String = get(row, "status")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let updated_at: DateTime<Utc> = get(row, "updated_at")?;

    let id = TeacherId::parse(&id).map_err(|e| corrupt_row("teacher", e))?;
    let school_id = SchoolId::parse(&school_id).map_err(|e| corrupt_row("teacher", e))?;
    let status: TeacherStatus = status.parse().map_err(|e| corrupt_row("teacher", e))?;

    Ok(Teacher::restore(
        id,
        get(row, "email")?,
        get(row, "first_name")?,
        get(row, "last_name")?,
        school_id,
        get(row, "grade_level")?,
        get(row, "wishlist_url")?,
        status,
        created_at,
        updated_at,
    ))
}
