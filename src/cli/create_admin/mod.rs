//! create-admin command - hashes and stores an operator account

use clap::Args;
use tracing::info;

use crate::domain::Admin;

/// Arguments for the create-admin command
#[derive(Args, Clone)]
pub struct CreateAdminArgs {
    /// Login name (at least 3 characters)
    #[arg(long)]
    pub username: String,

    /// Plain-text password, hashed before it is stored
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: CreateAdminArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let registry = super::open_registry(&config).await?;
    let ctx = config.storage.operation_context();

    let admin = Admin::new(
        &args.username,
        &args.password,
        registry.admins.password_hasher(),
    )?;
    registry.admins.create(&ctx, &admin).await?;

    info!(admin_id = %admin.id(), username = admin.username(), "Admin created");
    println!("{}", admin.id());

    Ok(())
}
