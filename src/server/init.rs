//! Server initialization and main run loop

use super::config::AppConfig;
use super::loader::load_config;
use super::providers::resolve_completion_provider;
use super::stores::init_tracker;
use super::validation::validate_config;
use crate::api::{api_router, AssistService, QuotaGate};
use crate::middleware::auth::AuthSettings;
use anyhow::{Context, Result};
use axum::{Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Assemble the HTTP application from its components
pub fn build_app(gate: QuotaGate, assist: AssistService, auth: AuthSettings) -> Router {
    api_router()
        .layer(Extension(Arc::new(gate)))
        .layer(Extension(Arc::new(assist)))
        .layer(Extension(Arc::new(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting Quillpad v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    validate_config(&config)?;
    serve(config).await
}

async fn serve(config: AppConfig) -> Result<()> {
    let tracker = init_tracker(&config).await?;
    let gate = QuotaGate::new(tracker, config.quota.daily_ceiling);
    info!(
        ceiling = config.quota.daily_ceiling,
        store = gate.tracker().store_name(),
        "Daily AI quota enabled"
    );

    let provider = resolve_completion_provider(&config.llm);
    let assist = AssistService::new(provider, &config.llm.model, config.llm.max_tokens);

    let auth = AuthSettings::from(&config.server.auth);
    if !auth.is_enabled() {
        warn!("Caller identity disabled: all requests share the anonymous quota");
    }

    let app = build_app(gate, assist, auth);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Quillpad shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
