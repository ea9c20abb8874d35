//! Store-backed response cache.
//!
//! [`ResponseCache`] persists generation results in the shared key-value
//! store so that an identical `(model, prompt, mode)` request can be
//! answered without touching the backend. The cache is a pure
//! optimization: every operation degrades to a no-op when the store is
//! unreachable, so an outage costs cache hits but never fails a request.
//! Cache hit/miss metrics are emitted per lookup.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::store::KeyValueStore;
use crate::types::{AskMode, CachedAnswer};
use crate::{telemetry, MimirError};

use super::{derive_key, CACHE_KEY_PATTERN, DEFAULT_CACHE_TTL};

/// Page size for cursor scans in [`clear`](ResponseCache::clear).
const SCAN_PAGE_SIZE: usize = 100;

/// Store-backed cache of generation results with per-entry expiry.
///
/// Holds a shared handle to the external store; no state is mirrored in
/// process, so every lookup re-reads the store and concurrent writers
/// race safely (last writer wins).
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    default_ttl: Duration,
}

impl ResponseCache {
    /// Create a cache over `store` with the default TTL (1 hour).
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(store, DEFAULT_CACHE_TTL)
    }

    /// Create a cache with a custom default TTL.
    pub fn with_ttl(store: Arc<dyn KeyValueStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// The TTL applied when [`put`](Self::put) is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a cached answer.
    ///
    /// Returns `None` on a miss, on an expired entry, and on any store
    /// or deserialization failure — a degraded store must never turn
    /// into a user-visible error on the lookup path.
    pub async fn get(&self, model: &str, prompt: &str, mode: AskMode) -> Option<CachedAnswer> {
        let key = derive_key(model, prompt, mode);
        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CachedAnswer>(&raw) {
                Ok(answer) => {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                    debug!(%key, "cache hit");
                    Some(answer)
                }
                Err(e) => {
                    // A corrupt entry is treated as a miss; it will be
                    // overwritten by the next successful generation.
                    warn!(%key, error = %e, "discarding undecodable cache entry");
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                    None
                }
            },
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                debug!(%key, "cache miss");
                None
            }
            Err(e) => {
                Self::record_store_error(&e, "get");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Persist an answer under the derived key, replacing any prior
    /// value.
    ///
    /// Returns `false` on any store failure; callers treat the write as
    /// best-effort and do not retry.
    pub async fn put(
        &self,
        model: &str,
        prompt: &str,
        answer: &CachedAnswer,
        mode: AskMode,
        ttl: Option<Duration>,
    ) -> bool {
        let key = derive_key(model, prompt, mode);
        let raw = match serde_json::to_string(answer) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, error = %e, "failed to serialize answer for caching");
                return false;
            }
        };
        let ttl = ttl.unwrap_or(self.default_ttl);
        match self.store.set_with_ttl(&key, &raw, ttl).await {
            Ok(()) => true,
            Err(e) => {
                Self::record_store_error(&e, "put");
                false
            }
        }
    }

    /// Delete cached answers matching `pattern` (default `llm:*`),
    /// paging through the keyspace with a cursor scan and deleting in
    /// batches.
    ///
    /// Returns the number of keys deleted, or 0 on any store failure.
    pub async fn clear(&self, pattern: Option<&str>) -> u64 {
        let pattern = pattern.unwrap_or(CACHE_KEY_PATTERN);
        let mut cursor = 0;
        let mut deleted = 0;
        loop {
            let (next_cursor, keys) =
                match self.store.scan(cursor, pattern, SCAN_PAGE_SIZE).await {
                    Ok(page) => page,
                    Err(e) => {
                        Self::record_store_error(&e, "clear");
                        return 0;
                    }
                };
            if !keys.is_empty() {
                match self.store.del(&keys).await {
                    Ok(n) => deleted += n,
                    Err(e) => {
                        Self::record_store_error(&e, "clear");
                        return 0;
                    }
                }
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        deleted
    }

    /// Probe store liveness. Returns `false` on any failure.
    pub async fn health(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                Self::record_store_error(&e, "health");
                false
            }
        }
    }

    fn record_store_error(error: &MimirError, operation: &str) {
        warn!(%error, operation, "cache store operation failed, degrading to no-op");
        metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "component" => "cache").increment(1);
    }
}
