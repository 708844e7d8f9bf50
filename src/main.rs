use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use scooterhub::{
    LocationDirectory, ScooterHubConfig, dataset::JsonFileRepository, logging, web,
};

#[derive(Parser)]
#[command(name = "scooterhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scooter location directory server", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "SCOOTERHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Location dataset, overrides the configured path
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Listen port, overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScooterHubConfig::load_from_path(cli.config)?;
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    logging::init(&config.logging)?;

    let repository = Arc::new(JsonFileRepository::new(config.dataset.path.clone()));
    let directory = Arc::new(
        LocationDirectory::open(repository, config.store_options())
            .with_context(|| format!("Failed to open dataset {}", config.dataset.path.display()))?,
    );

    web::run(&config.bind_address(), Arc::clone(&directory)).await?;

    directory.flush().await.context("Failed to write dataset on shutdown")?;
    tracing::info!("Dataset flushed, bye");
    Ok(())
}
