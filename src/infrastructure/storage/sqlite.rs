//! SQLite connection pool and schema

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use crate::domain::{DomainError, OpContext};
use crate::infrastructure::storage::errors::internal_error;

/// Transaction wrapping a single repository write
pub(crate) type WriteTx = Transaction<'static, Sqlite>;

/// SQLite storage configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database connection URL, e.g. `sqlite://registry.db` or `sqlite::memory:`
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Create the database file when it does not exist
    pub create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://school_registry.db".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
            create_if_missing: true,
        }
    }
}

impl SqliteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Private in-memory database, for tests and throwaway runs
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Schema for the three aggregates
///
/// Statements are idempotent so the schema can be applied on every start.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS schools (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        unique_key TEXT NOT NULL UNIQUE,
        address_street TEXT,
        address_city TEXT,
        address_state TEXT,
        address_zip_code TEXT,
        location_latitude REAL,
        location_longitude REAL,
        location_county TEXT,
        location_region TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        name_folded TEXT NOT NULL,
        address_city_folded TEXT NOT NULL DEFAULT '',
        address_state_folded TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teachers (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        school_id TEXT NOT NULL REFERENCES schools(id),
        grade_level TEXT NOT NULL DEFAULT '',
        wishlist_url TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'approved', 'rejected')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        grade_level_folded TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        username_folded TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_teachers_school_id ON teachers(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_teachers_status ON teachers(status)",
    "CREATE INDEX IF NOT EXISTS idx_schools_location ON schools(location_latitude, location_longitude)",
    "CREATE INDEX IF NOT EXISTS idx_schools_city_state ON schools(address_city, address_state)",
];

/// Open a pool with foreign key enforcement on every connection
pub async fn connect(config: &SqliteConfig) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DomainError::internal(format!("Invalid SQLite URL '{}': {}", config.url, e)))?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    // Each connection to `sqlite::memory:` is a separate database, so the pool
    // must hold exactly one connection and never recycle it.
    pool_options = if config.is_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| DomainError::internal(format!("Failed to connect to SQLite: {}", e)))?;

    info!(url = %config.url, "Connected to SQLite");
    Ok(pool)
}

/// Create tables and indexes when they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DomainError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to apply schema: {}", e)))?;
    }

    info!(statements = SCHEMA.len(), "SQLite schema ready");
    Ok(())
}

/// Start the transaction for one write
pub(crate) async fn begin_write(
    ctx: &OpContext,
    pool: &SqlitePool,
    operation: &str,
) -> Result<WriteTx, DomainError> {
    ctx.run(async { pool.begin().await.map_err(|e| internal_error(e, operation)) })
        .await
}

/// Commit a write unless `ctx` is already done
///
/// On any early return the transaction is dropped and rolled back, so an
/// interrupted statement never outlives the call that reported the failure.
pub(crate) async fn commit_write(
    ctx: &OpContext,
    tx: WriteTx,
    operation: &str,
) -> Result<(), DomainError> {
    if let Err(err) = ctx.check() {
        debug!(operation, error = %err, "Rolling back write");
        return Err(err);
    }

    tx.commit().await.map_err(|e| internal_error(e, operation))
}

/// Connect and apply the schema
pub async fn open(config: &SqliteConfig) -> Result<SqlitePool, DomainError> {
    let pool = connect(config).await?;
    init_schema(&pool).await?;
    Ok(pool)
}
