//! AI completion provider resolution

use super::config::LlmConfig;
use quillpad_llm::{CompletionProvider, OpenAiConfig, OpenAiProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the completion provider from the environment-held API key
///
/// Returns `None` when no key is configured; AI assist endpoints then answer
/// 503 without touching anyone's quota.
pub fn resolve_completion_provider(config: &LlmConfig) -> Option<Arc<dyn CompletionProvider>> {
    let openai = match OpenAiConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            warn!("AI assist disabled: {}", e);
            return None;
        }
    };

    let mut openai = openai
        .with_model(&config.model)
        .with_timeout(Duration::from_secs(config.timeout_secs));
    if let Some(base_url) = &config.base_url {
        openai = openai.with_base_url(base_url);
    }

    info!(model = %openai.default_model, "OpenAI provider configured");
    Some(Arc::new(OpenAiProvider::new(openai)))
}
