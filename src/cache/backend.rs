//! Backing Store Trait
//!
//! The narrow string-keyed interface the cache helper needs from a store.

use async_trait::async_trait;

use crate::error::Result;

/// String-keyed store with native per-key expiry.
///
/// Implementations hold raw JSON text; encoding and decoding stay in the helper.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored text, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value and expiry.
    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<()>;

    /// Removes `key`. Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Round-trips to the store to confirm it is reachable.
    async fn ping(&self) -> Result<()>;

    /// Short name used in logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Releases held connections. Later calls may reconnect.
    async fn close(&self) {}
}
