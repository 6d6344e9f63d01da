//! CLI module for the school registry
//!
//! Provides maintenance subcommands:
//! - `init-db`: open the configured store and apply the schema
//! - `create-admin`: hash and persist an operator account
//! - `stats`: print record counts as JSON

pub mod create_admin;
pub mod init_db;
pub mod stats;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::admin::Argon2Hasher;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{Registry, RegistryFactory};

/// School registry - schools, teacher wishlist registrations and operators
#[derive(Parser)]
#[command(name = "school-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database schema
    InitDb,

    /// Create an operator account
    CreateAdmin(create_admin::CreateAdminArgs),

    /// Print record counts as JSON
    Stats,
}

/// Load `.env` and configuration, then install logging
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    Ok(config)
}

/// Build the repositories for the configured backend
pub(crate) async fn open_registry(config: &AppConfig) -> anyhow::Result<Registry> {
    let storage = config.storage.storage_config()?;
    let registry = RegistryFactory::create(&storage, Arc::new(Argon2Hasher::new())).await?;

    Ok(registry)
}
