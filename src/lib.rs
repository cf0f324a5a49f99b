//! Quillpad - blog post AI assistance service
//!
//! Gates the post editor's AI actions behind a per-user daily quota and
//! forwards allowed requests to the completion provider with a
//! server-held API key.

#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod middleware;
pub mod server;
