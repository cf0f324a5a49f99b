//! Error types for quillpad-quota

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Quota error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The user has consumed today's full ceiling
    #[error("daily AI quota exceeded, resets at {retry_after}")]
    QuotaExceeded {
        /// Start of the next UTC day
        retry_after: DateTime<Utc>,
    },

    /// The storage backend failed or timed out
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Empty user id or non-positive ceiling
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether the failure is transient and worth retrying later
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Whether this is the expected "out of budget" outcome
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Stable machine-readable code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
