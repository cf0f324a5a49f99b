//! In-process usage store
//!
//! Serializes every mutation behind one mutex. Suitable for tests and
//! single-instance deployments; counts are lost on restart.
//!
//! There is no retention: one entry per (user, day) stays until the process
//! exits.

use super::traits::UsageStore;
use crate::error::Result;
use crate::record::{UsageKey, UsageRecord};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Usage store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    counts: Mutex<HashMap<UsageKey, u32>>,
}

impl MemoryUsageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.counts.lock().await.len()
    }

    /// Whether no record has been created yet
    pub async fn is_empty(&self) -> bool {
        self.counts.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UsageStore for MemoryUsageStore {
    async fn increment_if_below(&self, key: &UsageKey, ceiling: u32) -> Result<Option<u32>> {
        if ceiling == 0 {
            return Ok(None);
        }

        let mut counts = self.counts.lock().await;
        let count = counts.entry(key.clone()).or_insert(0);

        if *count >= ceiling {
            debug!(key = %key, count = *count, "Ceiling reached, not incrementing");
            return Ok(None);
        }

        *count += 1;
        Ok(Some(*count))
    }

    async fn count(&self, key: &UsageKey) -> Result<u32> {
        Ok(self.counts.lock().await.get(key).copied().unwrap_or(0))
    }

    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<UsageRecord>> {
        let counts = self.counts.lock().await;
        let mut records: Vec<UsageRecord> = counts
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(key, count)| UsageRecord {
                user_id: key.user_id.clone(),
                day: key.day,
                count: *count,
            })
            .collect();

        records.sort_by(|a, b| b.day.cmp(&a.day));
        records.truncate(limit);
        Ok(records)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
