//! Quillpad LLM - AI writing assistance
//!
//! This crate provides the completion side of the post editor's AI actions:
//! - Task: the `generate` / `refactor` assist tasks and their instructions
//! - Provider: completion provider trait
//! - OpenAI: chat completions with the API key held server-side

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod openai;
pub mod provider;
pub mod task;
pub mod util;

pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse, TokenUsage};
pub use task::{AssistTask, DEFAULT_MAX_TOKENS};
