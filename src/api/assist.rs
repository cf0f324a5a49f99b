//! AI assist endpoint
//!
//! POST /api/v1/ai/{task} — spend one quota unit and run a `generate` or
//! `refactor` completion on the writer's content.
//!
//! The quota is consumed before the provider is called and is not refunded
//! if the provider then fails.

use super::error::ApiError;
use super::quota::QuotaGate;
use crate::middleware::auth::RequireUser;
use axum::{
    extract::{Extension, Path},
    routing::post,
    Json, Router,
};
use quillpad_llm::{AssistTask, CompletionProvider, Message, MessageRole};
use quillpad_quota::Decision;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Completion provider plus request shaping
#[derive(Clone)]
pub struct AssistService {
    provider: Option<Arc<dyn CompletionProvider>>,
    model: String,
    max_tokens: u32,
}

impl AssistService {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub success: bool,
    pub task: AssistTask,
    pub content: String,
    pub model: String,
    pub remaining: u32,
}

#[instrument(skip_all, fields(user_id = %user_id, task = %task))]
async fn run_assist(
    Path(task): Path<String>,
    RequireUser(user_id): RequireUser,
    Extension(gate): Extension<Arc<QuotaGate>>,
    Extension(assist): Extension<Arc<AssistService>>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResponse>, ApiError> {
    let task: AssistTask = task.parse()?;

    let has_content = request
        .messages
        .iter()
        .any(|m| m.role != MessageRole::System && !m.content.trim().is_empty());
    if !has_content {
        return Err(ApiError::InvalidInput(
            "At least one non-empty message is required".to_string(),
        ));
    }

    let provider = assist.provider.as_ref().ok_or(ApiError::NotConfigured)?;

    let window = gate.tracker().window();
    let remaining = match gate
        .tracker()
        .try_consume_in(&window, &user_id, gate.ceiling())
        .await?
    {
        Decision::Allowed { remaining } => remaining,
        Decision::Denied(denial) => return Err(denial.into_error().into()),
    };

    let completion_request =
        task.build_request(request.messages, assist.model.clone(), assist.max_tokens);
    let response = provider.complete(completion_request).await?;

    info!(task = %task, remaining, model = %response.model, "AI assist completed");

    Ok(Json(AssistResponse {
        success: true,
        task,
        content: response.content,
        model: response.model,
        remaining,
    }))
}

/// Create the assist routes.
pub fn assist_routes() -> Router {
    Router::new().route("/api/v1/ai/:task", post(run_assist))
}
