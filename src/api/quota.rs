//! Quota API endpoints
//!
//! GET /api/v1/quota — the caller's remaining AI operations for today.
//! GET /api/v1/quota/history — the caller's past daily usage.

use super::error::ApiError;
use crate::middleware::auth::RequireUser;
use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use quillpad_quota::{QuotaTracker, UsageRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_HISTORY_LIMIT: usize = 30;
const MAX_HISTORY_LIMIT: usize = 366;

/// The tracker plus the ceiling this deployment enforces
#[derive(Clone)]
pub struct QuotaGate {
    tracker: QuotaTracker,
    ceiling: u32,
}

impl QuotaGate {
    pub fn new(tracker: QuotaTracker, ceiling: u32) -> Self {
        Self { tracker, ceiling }
    }

    pub fn tracker(&self) -> &QuotaTracker {
        &self.tracker
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

/// Response for GET /api/v1/quota
#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub success: bool,
    pub remaining: u32,
    pub ceiling: u32,
    pub day: String,
    pub resets_at: String,
    pub reset_in_seconds: u64,
    /// Set when the count could not be read; `remaining` is then 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// Response for GET /api/v1/quota/history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub ceiling: u32,
    pub records: Vec<UsageRecord>,
}

async fn get_quota(
    RequireUser(user_id): RequireUser,
    Extension(gate): Extension<Arc<QuotaGate>>,
) -> Result<Json<QuotaResponse>, ApiError> {
    let window = gate.tracker().window();
    let balance = gate
        .tracker()
        .remaining_in(&window, &user_id, gate.ceiling())
        .await?;

    Ok(Json(QuotaResponse {
        success: true,
        remaining: balance.remaining,
        ceiling: balance.ceiling,
        day: window.day.to_string(),
        resets_at: window.resets_at.to_rfc3339(),
        reset_in_seconds: window.seconds_until_reset(Utc::now()),
        error: balance
            .error
            .map(|_| "AI usage could not be loaded".to_string()),
    }))
}

async fn get_history(
    RequireUser(user_id): RequireUser,
    Extension(gate): Extension<Arc<QuotaGate>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let records = gate.tracker().history(&user_id, limit).await?;

    Ok(Json(HistoryResponse {
        success: true,
        ceiling: gate.ceiling(),
        records,
    }))
}

/// Create the quota routes.
pub fn quota_routes() -> Router {
    Router::new()
        .route("/api/v1/quota", get(get_quota))
        .route("/api/v1/quota/history", get(get_history))
}
