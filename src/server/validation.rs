//! Configuration validation
//!
//! Hard errors for unusable settings, warnings for risky production ones.

use super::config::{AppConfig, StoreBackend};
use anyhow::{bail, Result};
use tracing::warn;

/// Validate configuration before any component starts
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.quota.daily_ceiling == 0 {
        bail!("quota.daily_ceiling must be at least 1");
    }
    if config.quota.store_timeout_ms == 0 {
        bail!("quota.store_timeout_ms must be at least 1");
    }
    if config.quota.backend == StoreBackend::Redis
        && config
            .quota
            .redis_url
            .as_deref()
            .map_or(true, |u| u.trim().is_empty())
    {
        bail!("quota.redis_url is required when quota.backend = \"redis\"");
    }
    if config.server.auth.enabled && config.server.auth.user_header.trim().is_empty() {
        bail!("server.auth.user_header must not be empty");
    }

    let is_production = std::env::var("QUILLPAD_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false);

    if is_production {
        if !config.server.auth.enabled {
            warn!(
                "SECURITY WARNING: Caller identity is DISABLED in production; \
                 every request shares one AI quota."
            );
        }
        if config.quota.backend == StoreBackend::Memory {
            warn!("Memory usage store in production: quotas reset on every restart");
        }
    }

    Ok(())
}
