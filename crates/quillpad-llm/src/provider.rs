//! Completion provider trait

use crate::error::Result;
use crate::message::Message;
use serde::{Deserialize, Serialize};

/// A chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model to use; empty selects the provider default
    pub model: String,
    /// Conversation, system instruction first
    pub messages: Vec<Message>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// A chat completion result
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
}

/// AI completion provider
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
