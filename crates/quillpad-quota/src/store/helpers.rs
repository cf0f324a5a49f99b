//! Helper functions for store module

use crate::error::{Error, Result};
use chrono::NaiveDate;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Get the default data directory
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".quillpad"))
        .unwrap_or_else(|| std::path::PathBuf::from(".quillpad"))
}

/// Get the default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_data_dir().join("quillpad.db")
}

pub(crate) fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(crate) fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .map_err(|e| Error::StorageUnavailable(format!("invalid stored day {raw:?}: {e}")))
}

/// Stored counts are signed in SQL and Redis; clamp anything out of range
pub(crate) fn count_from_i64(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}
