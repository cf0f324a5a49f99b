//! Quillpad Quota - Daily AI usage quota
//!
//! This crate gates AI-assisted editing behind a per-user, per-day budget:
//! - Tracker: atomic check-and-increment and remaining-balance queries
//! - Store: persistence backends (in-memory, SQLite, Redis)
//! - Clock: UTC calendar-day resolution

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod decision;
pub mod error;
pub mod record;
pub mod store;
pub mod tracker;

pub use clock::{Clock, DayWindow, FixedClock, SystemClock};
pub use decision::{Balance, Decision, Denial, DenialReason};
pub use error::{Error, Result};
pub use record::{UsageKey, UsageRecord};
pub use store::{
    default_data_dir, default_db_path, MemoryUsageStore, RedisUsageStore, SqliteUsageStore,
    UsageStore,
};
pub use tracker::{QuotaTracker, DEFAULT_STORE_TIMEOUT};
