//! Health check endpoint

use super::assist::AssistService;
use super::quota::QuotaGate;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: String,
    pub ai_assist: bool,
}

async fn health(
    Extension(gate): Extension<Arc<QuotaGate>>,
    Extension(assist): Extension<Arc<AssistService>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store: gate.tracker().store_name().to_string(),
        ai_assist: assist.is_configured(),
    })
}

/// Create the health routes.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}
