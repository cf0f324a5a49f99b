//! Outcomes returned by the tracker

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a consume attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed; `remaining` is the budget left afterwards
    Allowed {
        /// Operations still available today
        remaining: u32,
    },
    /// The operation must not proceed; nothing was consumed
    Denied(Denial),
}

impl Decision {
    /// Whether the caller may issue the AI request
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Budget left after an allowed attempt
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Allowed { remaining } => Some(*remaining),
            Self::Denied(_) => None,
        }
    }

    /// The denial, if any
    #[must_use]
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Allowed { .. } => None,
            Self::Denied(denial) => Some(denial),
        }
    }
}

/// A non-mutating refusal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// End of the current usage day
    pub retry_after: DateTime<Utc>,
    /// Why the attempt was refused
    pub reason: DenialReason,
}

/// Why a consume attempt was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DenialReason {
    /// Today's ceiling has been reached
    QuotaExceeded,
    /// The store failed or timed out; denied to fail closed
    StorageUnavailable(String),
}

impl Denial {
    /// Whether the refusal came from a storage failure rather than the budget
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(self.reason, DenialReason::StorageUnavailable(_))
    }

    /// Convert into the matching error for `?` propagation
    #[must_use]
    pub fn into_error(self) -> Error {
        match self.reason {
            DenialReason::QuotaExceeded => Error::QuotaExceeded {
                retry_after: self.retry_after,
            },
            DenialReason::StorageUnavailable(msg) => Error::StorageUnavailable(msg),
        }
    }
}

/// Remaining budget for display
///
/// On storage failure `remaining` is 0 and `error` carries the cause, so a
/// render path can show the counter without unwinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    /// Operations still available today
    pub remaining: u32,
    /// Ceiling the balance was computed against
    pub ceiling: u32,
    /// Storage error, if the count could not be read
    pub error: Option<Error>,
}

impl Balance {
    /// Whether the balance reflects the stored count
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_denial_into_error() {
        let retry_after = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let exceeded = Denial {
            retry_after,
            reason: DenialReason::QuotaExceeded,
        };
        assert!(!exceeded.is_storage_failure());
        assert_eq!(exceeded.into_error(), Error::QuotaExceeded { retry_after });

        let failed = Denial {
            retry_after,
            reason: DenialReason::StorageUnavailable("pool closed".to_string()),
        };
        assert!(failed.is_storage_failure());
        assert!(failed.into_error().is_transient());
    }

    #[test]
    fn test_decision_accessors() {
        let allowed = Decision::Allowed { remaining: 2 };
        assert!(allowed.is_allowed());
        assert_eq!(allowed.remaining(), Some(2));
        assert!(allowed.denial().is_none());
    }
}
