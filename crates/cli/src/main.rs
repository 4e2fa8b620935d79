//! Balcao CLI - quotes, backups and WooCommerce sync from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Quote shipping for a 1kg, 20x15x10cm package
//! balcao quote -w 1 -l 20 -W 15 -H 10 --origin 01000-000 --destination 20000-000
//!
//! # Create a backup archive in the configured backup directory
//! balcao backup create --format tabular-markdown
//!
//! # Restore a backup archive into the local store
//! balcao backup restore ./backups/balcao-backup-20260806-153000.zip
//!
//! # Push the local catalog to WooCommerce / pull it back
//! balcao sync push
//! balcao sync pull
//!
//! # List products at or below the low-stock threshold
//! balcao stock low
//!
//! # Seed the store with demo data
//! balcao seed
//! ```
//!
//! # Commands
//!
//! - `quote` - Compute shipping quotes for a package
//! - `backup create` / `backup restore` - Backup archive round-trip
//! - `sync push` / `sync pull` / `sync webhook` - WooCommerce sync
//! - `stock low` - Low-stock report
//! - `seed` - Seed demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "balcao")]
#[command(author, version, about = "Balcao PDV command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute shipping quotes for a package
    Quote {
        /// Package weight in kilograms
        #[arg(short, long)]
        weight: Decimal,

        /// Package length in centimetres
        #[arg(short, long)]
        length: Decimal,

        /// Package width in centimetres
        #[arg(short = 'W', long)]
        width: Decimal,

        /// Package height in centimetres
        #[arg(short = 'H', long)]
        height: Decimal,

        /// Origin CEP
        #[arg(long)]
        origin: String,

        /// Destination CEP
        #[arg(long)]
        destination: String,
    },
    /// Create and restore backup archives
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },
    /// Sync the local catalog with WooCommerce
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
    /// Stock reports
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Seed the local store with demo data
    Seed,
}

#[derive(Subcommand)]
enum BackupAction {
    /// Create a backup archive from the local store
    Create {
        /// Renderer: structured-data, tabular-markdown or component-view
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (default: a timestamped name in the backup dir)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Restore a backup archive into the local store
    Restore {
        /// Path of the archive to restore
        archive: String,
    },
}

#[derive(Subcommand)]
enum SyncAction {
    /// Push local products to WooCommerce
    Push,
    /// Pull PDV-owned products back from WooCommerce
    Pull,
    /// Register or update the stock webhook
    Webhook,
}

#[derive(Subcommand)]
enum StockAction {
    /// List products at or below the low-stock threshold
    Low {
        /// Override the configured threshold
        #[arg(short, long)]
        threshold: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote {
            weight,
            length,
            width,
            height,
            origin,
            destination,
        } => {
            commands::quote::run(weight, length, width, height, &origin, &destination).await?;
        }
        Commands::Backup { action } => match action {
            BackupAction::Create { format, output } => {
                commands::backup::create(format.as_deref(), output.as_deref()).await?;
            }
            BackupAction::Restore { archive } => {
                commands::backup::restore(&archive).await?;
            }
        },
        Commands::Sync { action } => match action {
            SyncAction::Push => commands::sync::push().await?,
            SyncAction::Pull => commands::sync::pull().await?,
            SyncAction::Webhook => commands::sync::webhook().await?,
        },
        Commands::Stock { action } => match action {
            StockAction::Low { threshold } => commands::stock::low(threshold).await?,
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
