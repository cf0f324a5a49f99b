//! Server configuration types
//!
//! Contains all configuration structures for the Quillpad server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(quillpad_quota::default_data_dir)
    }

    /// Resolved SQLite path for the usage store
    pub fn sqlite_path(&self) -> PathBuf {
        self.quota
            .sqlite_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir().join("quillpad.db"))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: AuthConfig::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// Caller identity configuration
///
/// The session gateway in front of this server verifies the user's session
/// and forwards the account id in `user_header`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Require a verified user header
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Header carrying the verified account id
    #[serde(default = "default_user_header")]
    pub user_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_header: default_user_header(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_user_header() -> String {
    "x-user-id".to_string()
}

/// Usage store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
    Redis,
}

/// Daily AI quota configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// AI operations allowed per user per UTC day
    #[serde(default = "default_daily_ceiling")]
    pub daily_ceiling: u32,
    /// Bound on one store round trip
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    #[serde(default)]
    pub backend: StoreBackend,
    /// SQLite file; defaults to `<data_dir>/quillpad.db`
    #[serde(default)]
    pub sqlite_path: Option<String>,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_redis_ttl_secs")]
    pub redis_ttl_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_ceiling: default_daily_ceiling(),
            store_timeout_ms: default_store_timeout_ms(),
            backend: StoreBackend::default(),
            sqlite_path: None,
            redis_url: None,
            key_prefix: default_key_prefix(),
            redis_ttl_secs: default_redis_ttl_secs(),
        }
    }
}

fn default_daily_ceiling() -> u32 {
    5
}
fn default_store_timeout_ms() -> u64 {
    2000
}
fn default_key_prefix() -> String {
    "quillpad:usage:".to_string()
}
fn default_redis_ttl_secs() -> u64 {
    3 * 24 * 3600
}

/// AI completion configuration
///
/// The API key is read from `OPENAI_API_KEY` / `OPENAI_KEY` and never stored
/// in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: None,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    quillpad_llm::openai::DEFAULT_MODEL.to_string()
}
fn default_max_tokens() -> u32 {
    quillpad_llm::DEFAULT_MAX_TOKENS
}
fn default_llm_timeout_secs() -> u64 {
    60
}
