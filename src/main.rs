use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use passfield_guard::api;
use passfield_guard::config::AppConfig;
use passfield_guard::engine::{ConfigLoader, HttpFetcher, TrustStore};
use passfield_guard::init::setup_logging;
use passfield_guard::server::QueryHandler;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        AppConfig::load(&config_path).await?
    } else {
        AppConfig::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting passfield-guard...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Init Store & Loader
    let store = Arc::new(TrustStore::new());
    let fetcher = Arc::new(HttpFetcher::new());
    let loader = ConfigLoader::new(
        store.clone(),
        fetcher,
        config.config_url.clone(),
        config.base_url.clone(),
    );

    // 4. Pre-load config so the first query does not pay the fetch cost.
    // A failure is logged; queries will observe the fail-closed outcome.
    let preload = loader.clone();
    tokio::spawn(async move {
        if let Err(e) = preload.load().await {
            error!("Failed to pre-load config: {}", e);
        }
    });

    // 5. Build Handler & Start API Server
    let handler = QueryHandler::new(loader.clone(), store.clone());
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server_loader = loader.clone();
    let server = tokio::spawn(async move {
        api::start_api_server(handler, server_loader, store, listener).await;
    });

    // 6. Graceful Shutdown
    tokio::select! {
        _ = server => {},
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received.");
            loader.shutdown();
        }
    }

    Ok(())
}
