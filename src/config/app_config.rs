use std::time::Duration;

use serde::Deserialize;

use crate::domain::OpContext;
use crate::infrastructure::storage::{SqliteConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `sqlite`
    pub backend: String,
    /// SQLite URL, ignored by the memory backend
    pub url: String,
    pub max_connections: u32,
    /// Per-operation deadline; 0 disables it
    pub operation_timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        let sqlite = SqliteConfig::default();

        Self {
            backend: "sqlite".to_string(),
            url: sqlite.url,
            max_connections: sqlite.max_connections,
            operation_timeout_secs: 30,
        }
    }
}

impl StorageSettings {
    /// Resolve the backend settings into a [`StorageConfig`]
    pub fn storage_config(&self) -> Result<StorageConfig, config::ConfigError> {
        match StorageType::from_name(&self.backend) {
            Some(StorageType::InMemory) => Ok(StorageConfig::in_memory()),
            Some(StorageType::Sqlite) => Ok(StorageConfig::sqlite(
                SqliteConfig::new(&self.url).with_max_connections(self.max_connections),
            )),
            None => Err(config::ConfigError::Message(format!(
                "Unknown storage backend '{}'",
                self.backend
            ))),
        }
    }

    /// Root context for a single command, bounded by the operation timeout
    pub fn operation_context(&self) -> OpContext {
        let ctx = OpContext::background();

        match self.operation_timeout_secs {
            0 => ctx,
            secs => ctx.with_timeout(Duration::from_secs(secs)),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.storage.operation_timeout_secs, 30);
    }

    #[test]
    fn test_storage_config_resolution() {
        let mut settings = StorageSettings::default();
        settings.url = "sqlite::memory:".into();
        settings.max_connections = 3;

        match settings.storage_config().unwrap() {
            StorageConfig::Sqlite(sqlite) => {
                assert_eq!(sqlite.url, "sqlite::memory:");
                assert_eq!(sqlite.max_connections, 3);
            }
            other => panic!("Expected SQLite config, got {:?}", other),
        }

        settings.backend = "memory".into();
        assert_eq!(
            settings.storage_config().unwrap().storage_type(),
            StorageType::InMemory
        );

        settings.backend = "postgres".into();
        assert!(settings.storage_config().is_err());
    }

    #[test]
    fn test_deserialize_partial_sources() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [logging]
                format = "json"

                [storage]
                backend = "memory"
                operation_timeout_secs = 0
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.backend, "memory");
        assert!(config.storage.operation_context().deadline().is_none());
    }

    #[tokio::test]
    async fn test_operation_context_has_deadline() {
        let settings = StorageSettings::default();
        assert!(settings.operation_context().deadline().is_some());
    }
}
