//! init-db command - applies the schema to the configured store

use tracing::{info, warn};

use crate::infrastructure::storage::StorageType;

pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    let storage = config.storage.storage_config()?;

    if storage.storage_type() == StorageType::InMemory {
        warn!("In-memory backend selected, nothing will be persisted");
    }

    super::open_registry(&config).await?;

    info!(backend = %config.storage.backend, url = %config.storage.url, "Database initialized");
    println!("Schema ready ({})", config.storage.backend);

    Ok(())
}
