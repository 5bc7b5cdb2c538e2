use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rankwatch_api::{router, AppState};
use rankwatch_common::Config;
use rankwatch_tracker::{JsonFileStore, SerpApiSearcher, Tracker};

#[derive(Parser)]
#[command(name = "rankwatch", about = "Search ranking tracker for domains and keywords")]
struct Cli {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Path of the JSON data file (overrides DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rankwatch=info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    config.log_keys();

    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let searcher = Arc::new(SerpApiSearcher::new(
        &config.serp_api_key,
        config.serpapi_timeout,
    )?);
    let state = Arc::new(AppState {
        tracker: Tracker::new(store, searcher),
    });

    let addr = format!("{}:{}", config.host, config.port);
    info!("Rank Watch starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
