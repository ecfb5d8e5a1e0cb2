use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use linguaflow_backend::config_manager::Config;
use linguaflow_backend::routes;
use linguaflow_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linguaflow_backend=debug,tower_http=debug")),
        )
        .init();

    let (config, loaded_from) = Config::discover()?;
    match loaded_from {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("Using built-in configuration"),
    }
    if !config.llm_config.has_api_key() {
        warn!("No upstream API key configured; translations will fail upstream");
    }
    debug!("Upstream: {:?}", config.llm_config);

    let app_state = AppState::new(config.clone()).context("Failed to create upstream client")?;
    let app = routes::create_routes(app_state);

    let host: std::net::IpAddr = config
        .system_config
        .host
        .parse()
        .with_context(|| format!("Invalid host: {}", config.system_config.host))?;
    let addr = SocketAddr::new(host, config.system_config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
