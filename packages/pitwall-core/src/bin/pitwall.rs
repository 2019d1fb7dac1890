//! Pitwall CLI
//!
//! # Usage
//!
//! ```bash
//! # Load a fixture file into the configured store
//! pitwall --config pitwall.yaml seed --file data/season.json
//!
//! # Print a view as JSON
//! pitwall view races --format
//! pitwall view drivers --search max
//! pitwall view circuits --distinct --seed data/season.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pitwall_core::{handle, Fixtures, PitwallConfig, ViewQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitwall")]
#[command(about = "Pitwall - denormalized motorsport statistics views", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a fixture file into the store
    Seed {
        /// JSON file with circuits, drivers, teams and races
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Assemble a view and print the response
    View {
        /// circuits, drivers, teams or races
        collection: String,

        /// Case-insensitive pattern on the view's search field
        #[arg(short, long)]
        search: Option<String>,

        /// Format race times by finishing position
        #[arg(long)]
        format: bool,

        /// List each driver once per circuit
        #[arg(long)]
        distinct: bool,

        /// Seed from this fixture file first
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = PitwallConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(std::io::stderr)
        .init();

    let store = config.open_store()?;

    match cli.command {
        Commands::Seed { file } => {
            let written = Fixtures::from_path(&file)?.load_into(store.as_ref()).await?;
            println!("Seeded {} documents from {}", written, file.display());
        }
        Commands::View {
            collection,
            search,
            format,
            distinct,
            seed,
        } => {
            if let Some(file) = seed {
                Fixtures::from_path(&file)?.load_into(store.as_ref()).await?;
            }

            let mut query = ViewQuery::new()
                .with_format_times(format)
                .with_distinct_drivers(distinct);
            if let Some(search) = search {
                query = query.with_search(search);
            }

            let response = handle(store.as_ref(), &collection, &query).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
