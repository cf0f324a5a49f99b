//! Redis-backed usage store
//!
//! The conditional increment runs as a Lua script, which Redis executes
//! atomically. Keys expire a few days after their last write.

use super::helpers::{count_from_i64, parse_day};
use super::traits::UsageStore;
use crate::error::{Error, Result};
use crate::record::{UsageKey, UsageRecord};
use tracing::{debug, instrument};

const INCREMENT_IF_BELOW: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
if current >= tonumber(ARGV[1]) then
  return -1
end
local next = redis.call('INCR', KEYS[1])
redis.call('EXPIRE', KEYS[1], ARGV[2])
return next
"#;

const DAY_GLOB: &str = "[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]";

/// Usage store for multi-instance deployments sharing one Redis
pub struct RedisUsageStore {
    client: redis::Client,
    /// Key prefix for usage keys
    prefix: String,
    /// TTL in seconds
    ttl_seconds: u64,
}

impl RedisUsageStore {
    /// Create a new Redis store
    ///
    /// # Errors
    ///
    /// Returns error if Redis URL is invalid
    pub fn new(redis_url: &str) -> Result<Self> {
        Self::with_options(redis_url, "quillpad:usage:", 3 * 24 * 3600)
    }

    /// Create with custom prefix and TTL
    ///
    /// # Errors
    ///
    /// Returns error if Redis URL is invalid
    pub fn with_options(redis_url: &str, prefix: &str, ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
            ttl_seconds,
        })
    }

    /// Build the full Redis key
    fn build_key(&self, key: &UsageKey) -> String {
        format!("{}{}:{}", self.prefix, key.user_id, key.day)
    }

    /// Glob pattern matching every day key of exactly one user
    ///
    /// The day part is spelled out digit by digit so `alice` does not also
    /// match the keys of `alice:x`.
    fn user_pattern(&self, user_id: &str) -> String {
        let mut escaped = String::with_capacity(user_id.len());
        for c in user_id.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("{}{}:{}", self.prefix, escaped, DAY_GLOB)
    }

    /// Split a full key back into user id and day text
    fn split_key<'a>(&self, full_key: &'a str) -> Option<(&'a str, &'a str)> {
        full_key.strip_prefix(self.prefix.as_str())?.rsplit_once(':')
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Redis connection failed: {e}")))
    }
}

#[async_trait::async_trait]
impl UsageStore for RedisUsageStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn increment_if_below(&self, key: &UsageKey, ceiling: u32) -> Result<Option<u32>> {
        if ceiling == 0 {
            return Ok(None);
        }

        let mut conn = self.get_connection().await?;
        let result: i64 = redis::cmd("EVAL")
            .arg(INCREMENT_IF_BELOW)
            .arg(1)
            .arg(self.build_key(key))
            .arg(ceiling)
            .arg(self.ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Redis EVAL failed: {e}")))?;

        debug!(result, "Conditional increment executed");
        Ok((result >= 0).then(|| count_from_i64(result)))
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn count(&self, key: &UsageKey) -> Result<u32> {
        let mut conn = self.get_connection().await?;
        let value: Option<i64> = redis::cmd("GET")
            .arg(self.build_key(key))
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Redis GET failed: {e}")))?;

        Ok(value.map(count_from_i64).unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<UsageRecord>> {
        let mut conn = self.get_connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(self.user_pattern(user_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Redis KEYS failed: {e}")))?;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<i64>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::StorageUnavailable(format!("Redis MGET failed: {e}")))?;

        let mut records = Vec::with_capacity(keys.len());
        for (full_key, value) in keys.iter().zip(values) {
            let Some(count) = value else { continue };
            let Some((owner, day)) = self.split_key(full_key) else {
                continue;
            };
            if owner != user_id {
                continue;
            }
            records.push(UsageRecord {
                user_id: user_id.to_string(),
                day: parse_day(day)?,
                count: count_from_i64(count),
            });
        }

        records.sort_by(|a, b| b.day.cmp(&a.day));
        records.truncate(limit);
        Ok(records)
    }

    fn name(&self) -> &str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_key_layout() {
        let store = RedisUsageStore::new("redis://127.0.0.1:6379").unwrap();
        let key = UsageKey::new("u1", NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(store.build_key(&key), "quillpad:usage:u1:2025-03-01");
    }

    #[test]
    fn test_user_pattern_escapes_glob_characters() {
        let store = RedisUsageStore::with_options("redis://127.0.0.1:6379", "qp:", 60).unwrap();
        assert_eq!(
            store.user_pattern("a*b?"),
            "qp:a\\*b\\?:[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]"
        );
    }

    #[test]
    fn test_user_pattern_excludes_longer_user_ids() {
        let store = RedisUsageStore::with_options("redis://127.0.0.1:6379", "qp:", 60).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(store.user_pattern("alice"), format!("qp:alice:{DAY_GLOB}"));

        let other = store.build_key(&UsageKey::new("alice:x", day));
        assert_eq!(store.split_key(&other), Some(("alice:x", "2025-03-01")));
        let own = store.build_key(&UsageKey::new("alice", day));
        assert_eq!(store.split_key(&own), Some(("alice", "2025-03-01")));
        assert_eq!(store.split_key("other:alice:2025-03-01"), None);
    }
}
