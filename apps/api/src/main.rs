mod config;
mod dataset;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod strategy;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{DisabledGenerator, LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Planner API v{}", env!("CARGO_PKG_VERSION"));

    // Without a credential every strategy comes from the fallback generator
    let generator: Arc<dyn TextGenerator> = match config.anthropic_api_key.clone() {
        Some(key) => {
            let llm = LlmClient::new(key, &config)?;
            info!(
                "LLM client initialized (model: {}, timeout: {}s, attempts: {})",
                llm.model(),
                config.llm_timeout_secs,
                config.llm_max_attempts
            );
            Arc::new(llm)
        }
        None => {
            warn!("ANTHROPIC_API_KEY is not set; strategies will use the fallback generator");
            Arc::new(DisabledGenerator)
        }
    };

    let state = AppState::new(config.clone(), generator);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
