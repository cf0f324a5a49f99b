//! JSON error responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

/// API-level failure
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    Unauthorized,
    QuotaExceeded { retry_after_secs: u64 },
    StorageUnavailable,
    NotConfigured,
    Upstream(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::StorageUnavailable | Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::Unauthorized => "Sign in to use AI assistance".to_string(),
            Self::QuotaExceeded { .. } => {
                "You have used all of today's AI messages. Try again tomorrow.".to_string()
            }
            Self::StorageUnavailable => {
                "AI usage service is temporarily unavailable. Please try again later.".to_string()
            }
            Self::NotConfigured => "AI assistance is not configured on this server".to_string(),
            Self::Upstream(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            warn!(detail = %detail, "Internal API error");
        }

        let retry_after_secs = match &self {
            Self::QuotaExceeded { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: self.message(),
            code: self.code(),
            retry_after_secs,
        };

        let mut response = (self.status(), Json(body)).into_response();
        if let Some(secs) = retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<quillpad_quota::Error> for ApiError {
    fn from(err: quillpad_quota::Error) -> Self {
        match err {
            quillpad_quota::Error::QuotaExceeded { retry_after } => Self::QuotaExceeded {
                retry_after_secs: (retry_after - Utc::now()).num_seconds().max(0) as u64,
            },
            quillpad_quota::Error::StorageUnavailable(detail) => {
                warn!(detail = %detail, "Usage store unavailable");
                Self::StorageUnavailable
            }
            quillpad_quota::Error::InvalidInput(msg) => Self::InvalidInput(msg),
        }
    }
}

impl From<quillpad_llm::Error> for ApiError {
    fn from(err: quillpad_llm::Error) -> Self {
        match err {
            quillpad_llm::Error::InvalidTask(task) => {
                Self::InvalidInput(format!("Invalid task type: {task}"))
            }
            quillpad_llm::Error::NotConfigured(_) => Self::NotConfigured,
            other => {
                warn!(error = %other, "AI provider request failed");
                Self::Upstream("AI provider request failed. Please try again later.".to_string())
            }
        }
    }
}
