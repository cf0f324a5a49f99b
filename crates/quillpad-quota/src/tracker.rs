//! Daily quota tracker
//!
//! Gates each AI-assisted operation behind a per-user, per-day budget. The
//! tracker keeps no counts of its own: every decision is a single
//! conditional increment at the store, so concurrent sessions for the same
//! user can never overrun the ceiling.

use crate::clock::{Clock, DayWindow, SystemClock};
use crate::decision::{Balance, Decision, Denial, DenialReason};
use crate::error::{Error, Result};
use crate::record::{UsageKey, UsageRecord};
use crate::store::UsageStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default bound on a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-user daily quota tracker
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn UsageStore>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl QuotaTracker {
    /// Create a tracker over `store` using the wall clock
    #[must_use]
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound each store round trip; exceeding it counts as a storage failure
    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Name of the underlying store
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Resolve today's usage window
    ///
    /// Resolve once per request and pass the window to the `*_in` methods.
    #[must_use]
    pub fn window(&self) -> DayWindow {
        self.clock.window()
    }

    /// Consume one operation from today's budget if any is left
    pub async fn try_consume(&self, user_id: &str, ceiling: u32) -> Result<Decision> {
        let window = self.window();
        self.try_consume_in(&window, user_id, ceiling).await
    }

    /// Consume one operation from the budget of `window`
    ///
    /// Only invalid input is returned as `Err`. Exhausted budgets and store
    /// failures both come back as [`Decision::Denied`]; a denial never
    /// consumes anything.
    #[instrument(skip(self, window), fields(day = %window.day))]
    pub async fn try_consume_in(
        &self,
        window: &DayWindow,
        user_id: &str,
        ceiling: u32,
    ) -> Result<Decision> {
        validate(user_id, ceiling)?;
        let key = UsageKey::new(user_id, window.day);

        let outcome = self
            .bounded(self.store.increment_if_below(&key, ceiling))
            .await;

        let decision = match outcome {
            Ok(Some(count)) => {
                let remaining = ceiling.saturating_sub(count);
                debug!(count, remaining, "AI operation allowed");
                Decision::Allowed { remaining }
            }
            Ok(None) => {
                debug!("Daily AI quota exhausted");
                Decision::Denied(Denial {
                    retry_after: window.resets_at,
                    reason: DenialReason::QuotaExceeded,
                })
            }
            Err(e) => {
                warn!(error = %e, store = self.store.name(), "Quota store failed, denying");
                Decision::Denied(Denial {
                    retry_after: window.resets_at,
                    reason: DenialReason::StorageUnavailable(storage_message(e)),
                })
            }
        };

        Ok(decision)
    }

    /// Today's remaining budget
    pub async fn remaining(&self, user_id: &str, ceiling: u32) -> Result<Balance> {
        let window = self.window();
        self.remaining_in(&window, user_id, ceiling).await
    }

    /// Remaining budget for `window`, computed against the current ceiling
    ///
    /// A store failure yields `remaining: 0` with the error attached.
    #[instrument(skip(self, window), fields(day = %window.day))]
    pub async fn remaining_in(
        &self,
        window: &DayWindow,
        user_id: &str,
        ceiling: u32,
    ) -> Result<Balance> {
        validate(user_id, ceiling)?;
        let key = UsageKey::new(user_id, window.day);

        let balance = match self.bounded(self.store.count(&key)).await {
            Ok(count) => Balance {
                remaining: ceiling.saturating_sub(count),
                ceiling,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, store = self.store.name(), "Quota store failed reading balance");
                Balance {
                    remaining: 0,
                    ceiling,
                    error: Some(Error::StorageUnavailable(storage_message(e))),
                }
            }
        };

        Ok(balance)
    }

    /// Past usage for a user, newest day first
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<UsageRecord>> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user id must not be empty".to_string()));
        }
        self.bounded(self.store.history(user_id, limit)).await
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::StorageUnavailable(format!(
                "store round trip exceeded {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }
}

fn validate(user_id: &str, ceiling: u32) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user id must not be empty".to_string()));
    }
    if ceiling == 0 {
        return Err(Error::InvalidInput(
            "daily ceiling must be positive".to_string(),
        ));
    }
    Ok(())
}

fn storage_message(err: Error) -> String {
    match err {
        Error::StorageUnavailable(msg) => msg,
        other => other.to_string(),
    }
}
