//! Store - Usage counter persistence
//!
//! Every backend implements the same atomic conditional increment, so the
//! at-most-ceiling guarantee holds without application-level locking.

mod helpers;
mod memory;
mod redis_store;
mod sqlite;
mod traits;


pub use helpers::{default_data_dir, default_db_path};
pub use memory::MemoryUsageStore;
pub use redis_store::RedisUsageStore;
pub use sqlite::SqliteUsageStore;
pub use traits::UsageStore;
