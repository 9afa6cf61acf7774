//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Longest TTL accepted over HTTP: one year, in seconds.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Request body for `PUT /api/cache/:key`
///
/// # Fields
/// - `value`: Any JSON document to cache
/// - `ttl`: Optional TTL in seconds (server default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.ttl {
            Some(0) => Some("TTL must be at least 1 second".to_string()),
            Some(ttl) if ttl > MAX_TTL_SECS => Some(format!(
                "TTL must not exceed {} seconds",
                MAX_TTL_SECS
            )),
            _ => None,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }
}
