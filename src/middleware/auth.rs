//! Caller identity for Axum handlers
//!
//! Session verification happens upstream; this server trusts the account id
//! the gateway forwards and performs no identity checks of its own.

use crate::api::error::ApiError;
use crate::server::config::AuthConfig;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// User id used for every request when identity is disabled
pub const ANONYMOUS_USER: &str = "anonymous";

/// Resolved identity settings shared with the extractor
#[derive(Debug, Clone)]
pub struct AuthSettings {
    enabled: bool,
    user_header: String,
}

impl AuthSettings {
    /// Identity read from `header`
    pub fn from_header(header: impl Into<String>) -> Self {
        Self {
            enabled: true,
            user_header: header.into().to_ascii_lowercase(),
        }
    }

    /// Every caller is [`ANONYMOUS_USER`]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            user_header: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl From<&AuthConfig> for AuthSettings {
    fn from(config: &AuthConfig) -> Self {
        if config.enabled {
            Self::from_header(&config.user_header)
        } else {
            Self::disabled()
        }
    }
}

/// Axum extractor yielding the verified account id
pub struct RequireUser(pub String);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let settings = parts
            .extensions
            .get::<Arc<AuthSettings>>()
            .ok_or_else(|| ApiError::Internal("AuthSettings not configured".to_string()))?;

        if !settings.enabled {
            return Ok(RequireUser(ANONYMOUS_USER.to_string()));
        }

        parts
            .headers
            .get(settings.user_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| RequireUser(v.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
