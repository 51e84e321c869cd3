use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use climate_api::cli::Cli;
use climate_api::config::Settings;
use climate_api::{api, ClimateStore, QueryEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .compact()
        .init();

    let settings = Settings::load(&cli).context("Failed to load configuration")?;

    info!("Starting climate API...");

    // Open the dataset read-only
    let store = ClimateStore::open(&settings.database)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database.path.display()))?;

    let engine = QueryEngine::new(store);

    let addr = settings
        .server
        .address()
        .context("Invalid server host or port")?;

    api::serve(engine, addr).await
}
