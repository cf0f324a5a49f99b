//! Web API module for Quillpad
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - The caller's daily AI quota and usage history
//! - AI-assisted post generation and refactoring

pub mod assist;
pub mod error;
pub mod health;
pub mod quota;

use axum::Router;

pub use assist::{assist_routes, AssistService};
pub use error::ApiError;
pub use health::health_routes;
pub use quota::{quota_routes, QuotaGate};

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(health_routes())
        .merge(quota_routes())
        .merge(assist_routes())
}
