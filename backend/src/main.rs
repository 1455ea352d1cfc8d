mod config;
mod data_source;
mod error;
mod indicators;
mod models;
mod render;
mod routes;
mod series;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use data_source::YahooFinanceClient;
use state::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv() {
        // a missing .env is normal
        if !e.not_found() {
            eprintln!("Failed to read .env: {}", e);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        language = %config.language,
        trigger = ?config.trigger,
        "Configuration loaded"
    );

    let source = YahooFinanceClient::new(&config.yahoo_base_url, config.http_timeout)
        .context("Failed to build HTTP client")?;
    let addr = config.bind_addr;
    let state = AppState::new(config, Arc::new(source)).context("Invalid indicator windows")?;

    let (short_window, long_window) = (state.engine.short_window(), state.engine.long_window());
    info!(short_window, long_window, "Indicator engine ready");
    if short_window >= long_window {
        warn!("Short moving average window is not shorter than the long one");
    }

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
