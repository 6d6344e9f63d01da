//! SQLite school repository implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::record::{SchoolRecord, SCHOOL_COLUMNS};
use crate::domain::pagination::{sql_limit, sql_offset};
use crate::domain::{
    school_unique_key, DomainError, OpContext, School, SchoolFilters, SchoolId, SchoolRepository,
};
use crate::infrastructure::storage::errors::{classify_write_error, internal_error};
use crate::infrastructure::storage::sqlite::{begin_write, commit_write};

const ORDER_BY: &str = "ORDER BY name, address_city, address_state";

/// SQLite implementation of SchoolRepository
///
/// The `unique_key` column carries the normalized natural key, so the
/// engine's UNIQUE constraint is the source of truth for duplicates.
#[derive(Debug, Clone)]
pub struct SqliteSchoolRepository {
    pool: SqlitePool,
}

impl SqliteSchoolRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        value: String,
        missing: impl FnOnce() -> String,
    ) -> Result<School, DomainError> {
        let sql = format!("SELECT {} FROM schools WHERE {}", SCHOOL_COLUMNS, clause);

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal_error(e, "get school"))?;

        match row {
            Some(row) => SchoolRecord::from_row(&row)?.into_school(),
            None => Err(DomainError::not_found(missing())),
        }
    }

    async fn fetch_all(
        &self,
        sql: &str,
        binds: Vec<Option<String>>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<School>, DomainError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(value);
        }

        let rows = query
            .bind(sql_limit(limit))
            .bind(sql_offset(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal_error(e, "list schools"))?;

        rows.iter()
            .map(|row| SchoolRecord::from_row(row)?.into_school())
            .collect()
    }
}

fn duplicate_message(school: &School) -> String {
    format!(
        "School '{}' already exists in {}, {}",
        school.name(),
        school.address().city(),
        school.address().state()
    )
}

#[async_trait]
impl SchoolRepository for SqliteSchoolRepository {
    async fn create(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError> {
        school.validate_invariants()?;

        let sql = format!(
            "INSERT INTO schools ({}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            SCHOOL_COLUMNS
        );

        let mut tx = begin_write(ctx, &self.pool, "create school").await?;
        ctx.run(async {
            SchoolRecord::from_school(school)
                .bind(sqlx::query(&sql))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    classify_write_error(
                        e,
                        "create school",
                        || duplicate_message(school),
                        || format!("School '{}' references a missing record", school.id()),
                    )
                })
        })
        .await?;
        commit_write(ctx, tx, "create school").await?;

        debug!(school_id = %school.id(), name = school.name(), "Created school");
        Ok(())
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &SchoolId) -> Result<School, DomainError> {
        ctx.run(self.fetch_one_where("id = ?1", id.to_string(), || {
            format!("School '{}' not found", id)
        }))
        .await
    }

    async fn get_by_name_city_state(
        &self,
        ctx: &OpContext,
        name: &str,
        city: &str,
        state: &str,
    ) -> Result<School, DomainError> {
        let key = school_unique_key(name, city, state);

        ctx.run(self.fetch_one_where("unique_key = ?1", key, || {
            format!(
                "School '{}' not found in {}, {}",
                name.trim(),
                city.trim(),
                state.trim()
            )
        }))
        .await
    }

    async fn update(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError> {
        school.validate_invariants()?;

        let mut tx = begin_write(ctx, &self.pool, "update school").await?;
        let result = ctx
            .run(async {
                SchoolRecord::from_school(school)
                    .bind(sqlx::query(
                        r#"
                        UPDATE schools
                        SET name = ?2, unique_key = ?3, address_street = ?4, address_city = ?5,
                            address_state = ?6, address_zip_code = ?7, location_latitude = ?8,
                            location_longitude = ?9, location_county = ?10, location_region = ?11,
                            created_at = ?12, updated_at = ?13, name_folded = ?14,
                            address_city_folded = ?15, address_state_folded = ?16
                        WHERE id = ?1
                        "#,
                    ))
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        classify_write_error(
                            e,
                            "update school",
                            || duplicate_message(school),
                            || format!("School '{}' references a missing record", school.id()),
                        )
                    })
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "School '{}' not found",
                school.id()
            )));
        }

        commit_write(ctx, tx, "update school").await?;

        debug!(school_id = %school.id(), "Updated school");
        Ok(())
    }

    async fn delete(&self, ctx: &OpContext, id: &SchoolId) -> Result<(), DomainError> {
        let mut tx = begin_write(ctx, &self.pool, "delete school").await?;
        let result = ctx
            .run(async {
                sqlx::query("DELETE FROM schools WHERE id = ?1")
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        classify_write_error(
                            e,
                            "delete school",
                            || format!("School '{}' already exists", id),
                            || format!("School '{}' is still referenced by teachers", id),
                        )
                    })
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("School '{}' not found", id)));
        }

        commit_write(ctx, tx, "delete school").await?;

        debug!(school_id = %id, "Deleted school");
        Ok(())
    }

    async fn get_all(&self, ctx: &OpContext) -> Result<Vec<School>, DomainError> {
        self.list(ctx, &SchoolFilters::default()).await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filters: &SchoolFilters,
    ) -> Result<Vec<School>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM schools
            WHERE (?1 IS NULL OR instr(name_folded, ?1) > 0)
              AND (?2 IS NULL OR instr(address_city_folded, ?2) > 0)
              AND (?3 IS NULL OR instr(address_state_folded, ?3) > 0)
            {}
            LIMIT ?4 OFFSET ?5
            "#,
            SCHOOL_COLUMNS, ORDER_BY
        );

        let fold = |value: &Option<String>| value.as_ref().map(|v| v.to_lowercase());
        let binds = vec![
            fold(&filters.name),
            fold(&filters.city),
            fold(&filters.state),
        ];

        ctx.run(self.fetch_all(&sql, binds, filters.limit, filters.offset))
            .await
    }

    async fn search(
        &self,
        ctx: &OpContext,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<School>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM schools
            WHERE instr(name_folded, ?1) > 0
               OR instr(address_city_folded, ?1) > 0
               OR instr(address_state_folded, ?1) > 0
            {}
            LIMIT ?2 OFFSET ?3
            "#,
            SCHOOL_COLUMNS, ORDER_BY
        );

        let binds = vec![Some(query.trim().to_lowercase())];

        ctx.run(self.fetch_all(&sql, binds, limit, None)).await
    }
}
