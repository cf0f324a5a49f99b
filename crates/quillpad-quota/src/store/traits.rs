//! Trait for usage storage backends

use crate::error::Result;
use crate::record::{UsageKey, UsageRecord};

/// Storage collaborator for usage counters
///
/// Implementations must make `increment_if_below` a single atomic step:
/// two concurrent callers may never both observe `count < ceiling` and both
/// increment.
#[async_trait::async_trait]
pub trait UsageStore: Send + Sync {
    /// Create the record for `key` if missing, then add one to its count
    /// only if the result would not exceed `ceiling`.
    ///
    /// Returns the new count, or `None` when the ceiling was already reached
    /// (in which case nothing is written).
    async fn increment_if_below(&self, key: &UsageKey, ceiling: u32) -> Result<Option<u32>>;

    /// Current count for `key`, 0 if no record exists
    async fn count(&self, key: &UsageKey) -> Result<u32>;

    /// Most recent records for a user, newest day first
    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<UsageRecord>>;

    /// Backend name (for logging)
    fn name(&self) -> &str;
}
