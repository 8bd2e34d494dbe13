use std::sync::Arc;

use anyhow::Context;
use sentinel_client::GeminiClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod repository;
pub mod service;
pub mod state;
pub mod view;

use config::Config;
use repository::session_repository::SessionStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sentinel dashboard...");

    let config = Config::from_env();
    config.validate()?;

    if config.api_key.is_empty() {
        tracing::warn!("No GEMINI_API_KEY or API_KEY set, analysis requests will fail");
    }

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.analysis_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build().context("Failed to build HTTP client")?;

    let analyzer = GeminiClient::with_client(&config.api_base_url, &config.api_key, http)
        .with_model(&config.model);

    tracing::info!(
        "Using model {} at {}",
        analyzer.model(),
        analyzer.base_url()
    );

    let state = AppState::new(SessionStore::new(config.log_capacity), Arc::new(analyzer));

    // Build router with all endpoints
    let app = api::create_router(state, config.max_upload_bytes);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
