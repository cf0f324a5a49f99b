//! SqliteUsageStore - SQLite-based usage storage

use super::helpers::{count_from_i64, format_day, parse_day};
use super::traits::UsageStore;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::record::{UsageKey, UsageRecord};
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Usage store persisting one row per (user, day) to SQLite
#[derive(Clone)]
pub struct SqliteUsageStore {
    pool: SqlitePool,
    /// Stamps `updated_at`
    clock: Arc<dyn Clock>,
}

impl SqliteUsageStore {
    /// Create a new usage store with the given connection pool
    ///
    /// The caller is responsible for having run [`Self::migrate`].
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for `updated_at`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a new usage store from a database path
    ///
    /// This will create the database file if it doesn't exist and run migrations.
    pub async fn from_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::StorageUnavailable(format!("failed to create directory: {e}"))
            })?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;

        info!("SQLite usage store initialized at {}", db_path.display());
        Ok(store)
    }

    /// Create a new in-memory usage store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;

        debug!("In-memory SQLite usage store initialized");
        Ok(store)
    }

    /// Create the usage table if it does not exist
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ai_usage (
                user_id TEXT NOT NULL,
                day TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, day)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_ai_usage_day
            ON ai_usage(day)
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Usage table migrations completed");
        Ok(())
    }

    /// Get a reference to the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Delete all records for days strictly before `day`
    ///
    /// Retention belongs to the store; the tracker never deletes history.
    #[instrument(skip(self))]
    pub async fn prune_before(&self, day: NaiveDate) -> Result<u64> {
        let result = sqlx::query("DELETE FROM ai_usage WHERE day < ?1")
            .bind(format_day(day))
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        info!(removed, before = %day, "Pruned usage history");
        Ok(removed)
    }

    fn row_to_record(row: SqliteRow) -> Result<UsageRecord> {
        let day: String = row.get("day");
        Ok(UsageRecord {
            user_id: row.get("user_id"),
            day: parse_day(&day)?,
            count: count_from_i64(row.get("count")),
        })
    }
}

#[async_trait::async_trait]
impl UsageStore for SqliteUsageStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn increment_if_below(&self, key: &UsageKey, ceiling: u32) -> Result<Option<u32>> {
        if ceiling == 0 {
            return Ok(None);
        }

        // One statement: the row is created or bumped only while below the
        // ceiling, and RETURNING yields nothing when the WHERE rejects it.
        let row = sqlx::query(
            r#"
            INSERT INTO ai_usage (user_id, day, count, updated_at)
            VALUES (?1, ?2, 1, ?4)
            ON CONFLICT(user_id, day) DO UPDATE
                SET count = ai_usage.count + 1,
                    updated_at = excluded.updated_at
                WHERE ai_usage.count < ?3
            RETURNING count
            "#,
        )
        .bind(&key.user_id)
        .bind(format_day(key.day))
        .bind(i64::from(ceiling))
        .bind(self.clock.now().to_rfc3339())
        .fetch_optional(&self.pool)
        .await?;

        let count = row.map(|r| count_from_i64(r.get::<i64, _>("count")));
        debug!(?count, "Conditional increment executed");
        Ok(count)
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn count(&self, key: &UsageKey) -> Result<u32> {
        let row = sqlx::query(
            r#"
            SELECT count FROM ai_usage
            WHERE user_id = ?1 AND day = ?2
            "#,
        )
        .bind(&key.user_id)
        .bind(format_day(key.day))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(|r| count_from_i64(r.get::<i64, _>("count")))
            .unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<UsageRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, day, count FROM ai_usage
            WHERE user_id = ?1
            ORDER BY day DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
