//! Cache Helper Module
//!
//! JSON façade over a `KeyValueStore`. The plain operations never fail: errors
//! are logged and turned into `None`/`false`. The `try_*` variants return them.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::cache::{CacheStats, KeyValueStore, MemoryStore, RedisStore, StatsRecorder};
use crate::config::{CacheBackend, Config};
use crate::error::{CacheError, Result};

// == Cache Helper ==
/// Best-effort JSON cache over a shared backing store.
pub struct CacheHelper {
    store: Arc<dyn KeyValueStore>,
    default_ttl: Duration,
    stats: StatsRecorder,
}

impl CacheHelper {
    // == Constructor ==
    /// Wraps an already constructed store.
    ///
    /// # Arguments
    /// * `store` - Backing store, owned for the helper's lifetime
    /// * `default_ttl` - Expiry used by `set` when no TTL is given
    pub fn new(store: Arc<dyn KeyValueStore>, default_ttl: Duration) -> Self {
        Self {
            store,
            default_ttl,
            stats: StatsRecorder::new(),
        }
    }

    /// Builds the helper and store described by `config`. Does not connect.
    ///
    /// The memory store built here has no expiry sweep; `main` builds its own
    /// so it can hand the store to `spawn_cleanup_task`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match config.backend {
            CacheBackend::Redis => Arc::new(RedisStore::open(&config.redis_url())?),
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(store, config.default_ttl_duration()))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // == Get ==
    /// Reads and decodes `key`. `None` if absent, expired, or on any error.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(err) => {
                self.stats.record_error();
                error!(op = "get", key, error = %err, "Cache get failed");
                None
            }
        }
    }

    /// Reads and decodes `key`, returning the underlying error on failure.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            self.stats.record_miss();
            debug!(key, "Cache miss");
            return Ok(None);
        };

        let value = serde_json::from_str(&raw)?;
        self.stats.record_hit();
        Ok(Some(value))
    }

    // == Set ==
    /// Encodes `value` as JSON and stores it under `key`.
    ///
    /// `ttl` defaults to the configured TTL. Returns `false` on any error.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> bool {
        match self.try_set(key, value, ttl).await {
            Ok(()) => true,
            Err(err) => {
                self.stats.record_error();
                error!(op = "set", key, error = %err, "Cache set failed");
                false
            }
        }
    }

    pub async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let ttl_secs = ttl.as_secs();
        if ttl_secs == 0 {
            return Err(CacheError::InvalidTtl(ttl.as_millis()));
        }

        let payload = serde_json::to_string(value)?;
        self.store.set_ex(key, payload, ttl_secs).await?;
        self.stats.record_write();
        debug!(key, ttl_secs, "Cache set");
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. `true` on success whether or not the key existed.
    pub async fn delete(&self, key: &str) -> bool {
        match self.try_delete(key).await {
            Ok(_) => true,
            Err(err) => {
                self.stats.record_error();
                error!(op = "delete", key, error = %err, "Cache delete failed");
                false
            }
        }
    }

    /// Removes `key`, returning whether a live entry was removed.
    pub async fn try_delete(&self, key: &str) -> Result<bool> {
        let removed = self.store.delete(key).await?;
        self.stats.record_delete();
        debug!(key, removed, "Cache delete");
        Ok(removed)
    }

    // == Health ==
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Shutdown ==
    /// Releases the store's connections.
    pub async fn close(&self) {
        self.store.close().await;
        info!(backend = self.backend_name(), "Cache store closed");
    }
}
