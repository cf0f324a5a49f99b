//! Middleware module for Quillpad HTTP server
//!
//! Provides:
//! - Caller identity extraction from the session gateway header

pub mod auth;
