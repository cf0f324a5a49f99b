//! Server module for Quillpad
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `providers`: AI completion provider resolution
//! - `stores`: Usage store and quota tracker construction
//! - `validation`: Configuration validation
//! - `init`: Router assembly and run loop

pub mod config;
mod init;
mod loader;
mod providers;
mod stores;
mod validation;

// Re-export public API
pub use init::{build_app, run};
pub use loader::load_config;
pub use providers::resolve_completion_provider;
pub use stores::{init_tracker, init_usage_store, open_sqlite_store};
pub use validation::validate_config;
