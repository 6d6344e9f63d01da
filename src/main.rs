use clap::Parser;
use school_registry::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::InitDb => cli::init_db::run().await,
        Command::CreateAdmin(args) => cli::create_admin::run(args).await,
        Command::Stats => cli::stats::run().await,
    }
}
