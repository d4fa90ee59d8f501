//! # commerce-store CLI Entry Point
//!
//! Operational commands for the commerce store database.

use clap::Parser;
use commerce_store::{Store, StoreConfig};
use std::path::PathBuf;

/// Commerce store maintenance toolchain.
///
/// Applies schema migrations and checks database connectivity using the
/// same configuration the backend loads at startup.
#[derive(Parser, Debug)]
#[command(name = "commerce-store", version, about)]
struct Cli {
    /// YAML configuration file; `COMMERCE_STORE_*` variables override it
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    /// One JSON object per line
    Json,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Apply pending schema migrations.
    Migrate,
    /// Show applied and pending migrations.
    Status,
    /// Connect, migrate when configured, and ping the database.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commerce_store::logging::init_tracing(cli.log_format == LogFormat::Json)?;

    let mut config = StoreConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Migrate => {
            config.run_migrations = true;
            Store::connect(&config).await?;
        }
        Commands::Status => {
            config.run_migrations = false;
            let store = Store::connect(&config).await?;
            let status = store.migration_status().await?;
            for name in &status.applied {
                println!("applied  {name}");
            }
            for name in &status.pending {
                println!("pending  {name}");
            }
        }
        Commands::Check => {
            let store = Store::connect(&config).await?;
            store.ping().await?;
            tracing::info!("commerce database is reachable");
        }
    }

    Ok(())
}
