//! Usage store initialization

use super::config::{AppConfig, StoreBackend};
use anyhow::{Context, Result};
use quillpad_quota::{
    MemoryUsageStore, QuotaTracker, RedisUsageStore, SqliteUsageStore, UsageStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Open the configured usage store
pub async fn init_usage_store(config: &AppConfig) -> Result<Arc<dyn UsageStore>> {
    let store: Arc<dyn UsageStore> = match config.quota.backend {
        StoreBackend::Memory => Arc::new(MemoryUsageStore::new()),
        StoreBackend::Sqlite => {
            let path = config.sqlite_path();
            Arc::new(
                SqliteUsageStore::from_path(&path)
                    .await
                    .context("Failed to initialize SQLite usage store")?,
            )
        }
        StoreBackend::Redis => {
            let url = config
                .quota
                .redis_url
                .as_deref()
                .context("quota.redis_url is not set")?;
            Arc::new(
                RedisUsageStore::with_options(
                    url,
                    &config.quota.key_prefix,
                    config.quota.redis_ttl_secs,
                )
                .context("Failed to create Redis usage store")?,
            )
        }
    };

    info!(store = store.name(), "Usage store ready");
    Ok(store)
}

/// Build the quota tracker over the configured store
pub async fn init_tracker(config: &AppConfig) -> Result<QuotaTracker> {
    let store = init_usage_store(config).await?;
    Ok(QuotaTracker::new(store)
        .with_store_timeout(Duration::from_millis(config.quota.store_timeout_ms)))
}

/// Open the SQLite store directly (for maintenance commands)
pub async fn open_sqlite_store(config: &AppConfig) -> Result<SqliteUsageStore> {
    if config.quota.backend != StoreBackend::Sqlite {
        anyhow::bail!("this command requires quota.backend = \"sqlite\"");
    }
    SqliteUsageStore::from_path(&config.sqlite_path())
        .await
        .context("Failed to open SQLite usage store")
}
