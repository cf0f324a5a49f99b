//! Usage records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one usage counter: a user on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageKey {
    /// Verified account identifier
    pub user_id: String,
    /// UTC calendar day
    pub day: NaiveDate,
}

impl UsageKey {
    /// Create a new key
    #[must_use]
    pub fn new(user_id: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            day,
        }
    }
}

impl fmt::Display for UsageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user_id, self.day)
    }
}

/// Number of AI operations a user consumed on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Verified account identifier
    pub user_id: String,
    /// UTC calendar day
    pub day: NaiveDate,
    /// Operations consumed so far
    pub count: u32,
}

impl UsageRecord {
    /// The key this record is stored under
    #[must_use]
    pub fn key(&self) -> UsageKey {
        UsageKey::new(self.user_id.clone(), self.day)
    }

    /// Remaining budget against `ceiling`; a lowered ceiling never goes negative
    #[must_use]
    pub fn remaining(&self, ceiling: u32) -> u32 {
        ceiling.saturating_sub(self.count)
    }
}
