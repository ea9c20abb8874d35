//! Key-value store seam shared by the cache and the rate limiter.
//!
//! The store is the single source of truth and the only synchronization
//! point between concurrent requests: neither the cache nor the limiter
//! mirrors any of its state in process. Implementations are expected to
//! fail transiently; callers above this seam decide whether a failure
//! degrades to a no-op (cache) or fails open (limiter).

mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// Async key-value store with TTL support.
///
/// The operation set mirrors the Redis commands the gateway needs:
/// GET, SETEX, INCR, EXPIRE, SCAN, DEL, and PING. All methods are
/// network I/O and may fail with [`MimirError::Store`](crate::MimirError::Store).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key. Absent and expired keys both return `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key with a time-to-live, replacing any prior value.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Atomically increment an integer counter, creating it at 1 if
    /// absent. Returns the post-increment value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Set a key's time-to-live without touching its value.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// One page of a cursor scan over keys matching `pattern`
    /// (`*` wildcard). Returns the next cursor (0 = done) and the page
    /// of matching keys; `count` is a page-size hint.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)>;

    /// Delete keys, returning how many existed.
    async fn del(&self, keys: &[String]) -> Result<u64>;

    /// Liveness probe.
    async fn ping(&self) -> Result<()>;
}
