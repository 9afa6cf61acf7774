//! Shop Cache - JSON cache helper for the shop backend
//!
//! Best-effort get/set/delete over Redis with store-native TTL expiry.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheHelper, KeyValueStore, MemoryStore, RedisStore};
pub use config::{CacheBackend, Config};
pub use tasks::spawn_cleanup_task;
