//! Cache Module
//!
//! JSON cache helper over a pluggable key-value store (Redis or in-process).

mod backend;
mod entry;
mod helper;
mod memory;
mod redis_store;
mod stats;


// Re-export public types
pub use backend::KeyValueStore;
pub use entry::CacheEntry;
pub use helper::CacheHelper;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use stats::{CacheStats, StatsRecorder};

// == Public Constants ==
/// Maximum key length accepted by the HTTP surface, in bytes
pub const MAX_KEY_LENGTH: usize = 256;
