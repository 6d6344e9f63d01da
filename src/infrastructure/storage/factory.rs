//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::{AdminRepository, DomainError, PasswordHasher, SchoolRepository, TeacherRepository};
use crate::infrastructure::admin::SqliteAdminRepository;
use crate::infrastructure::school::SqliteSchoolRepository;
use crate::infrastructure::teacher::SqliteTeacherRepository;

use super::memory::InMemoryStore;
use super::sqlite::{self, SqliteConfig};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// SQLite storage
    Sqlite,
}

impl StorageType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Sqlite(SqliteConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn sqlite(config: SqliteConfig) -> Self {
        Self::Sqlite(config)
    }

    /// SQLite configuration from a URL
    pub fn sqlite_url(url: impl Into<String>) -> Self {
        Self::Sqlite(SqliteConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Sqlite(_) => StorageType::Sqlite,
        }
    }
}

/// The three repositories over one backend
#[derive(Debug, Clone)]
pub struct Registry {
    pub schools: Arc<dyn SchoolRepository>,
    pub teachers: Arc<dyn TeacherRepository>,
    pub admins: Arc<dyn AdminRepository>,
}

/// Factory for creating repository sets
#[derive(Debug)]
pub struct RegistryFactory;

impl RegistryFactory {
    /// Open the configured backend and build its repositories
    ///
    /// The SQLite schema is applied before the repositories are returned.
    pub async fn create(
        config: &StorageConfig,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Registry, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::create_in_memory(&InMemoryStore::new(), hasher))
            }
            StorageConfig::Sqlite(sqlite_config) => {
                let pool = sqlite::open(sqlite_config).await?;
                Ok(Self::create_sqlite(pool, hasher))
            }
        }
    }

    /// Repositories sharing `store`
    pub fn create_in_memory(store: &InMemoryStore, hasher: Arc<dyn PasswordHasher>) -> Registry {
        Registry {
            schools: Arc::new(store.schools()),
            teachers: Arc::new(store.teachers()),
            admins: Arc::new(store.admins(hasher)),
        }
    }

    /// Repositories sharing `pool`
    pub fn create_sqlite(pool: sqlx::SqlitePool, hasher: Arc<dyn PasswordHasher>) -> Registry {
        Registry {
            schools: Arc::new(SqliteSchoolRepository::new(pool.clone())),
            teachers: Arc::new(SqliteTeacherRepository::new(pool.clone())),
            admins: Arc::new(SqliteAdminRepository::new(pool, hasher)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Address, Location};
    use crate::domain::{OpContext, School, Teacher};
    use crate::infrastructure::admin::Argon2Hasher;

    #[test]
    fn test_storage_type_from_name() {
        assert_eq!(StorageType::from_name("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_name("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_name("sqlite"), Some(StorageType::Sqlite));
        assert_eq!(StorageType::from_name(" SQLite3 "), Some(StorageType::Sqlite));
        assert_eq!(StorageType::from_name("postgres"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::sqlite_url("sqlite::memory:").storage_type(),
            StorageType::Sqlite
        );
    }

    async fn exercise(registry: Registry) {
        let ctx = OpContext::background();
        let address = Address::new("", "Springfield", "IL", "", Location::default()).unwrap();
        let school = School::new("Lincoln", address).unwrap();
        registry.schools.create(&ctx, &school).await.unwrap();

        let teacher = Teacher::new("jane@school.org", "Jane", "Doe", *school.id(), "").unwrap();
        registry.teachers.create(&ctx, &teacher).await.unwrap();

        assert!(registry
            .schools
            .delete(&ctx, school.id())
            .await
            .unwrap_err()
            .is_foreign_key());
        assert_eq!(registry.admins.count(&ctx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_in_memory_registry() {
        let registry = RegistryFactory::create(&StorageConfig::in_memory(), Arc::new(Argon2Hasher::new()))
            .await
            .unwrap();
        exercise(registry).await;
    }

    #[tokio::test]
    async fn test_create_sqlite_registry() {
        let registry = RegistryFactory::create(
            &StorageConfig::sqlite(SqliteConfig::in_memory()),
            Arc::new(Argon2Hasher::new()),
        )
        .await
        .unwrap();
        exercise(registry).await;
    }
}
