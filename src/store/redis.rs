//! Redis-backed implementation of [`KeyValueStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::{MimirError, Result};

use super::KeyValueStore;

/// Redis-backed key-value store.
///
/// Obtains a multiplexed connection per operation from a shared
/// [`redis::Client`], so one `RedisStore` handle can be cloned into the
/// cache and the limiter and used concurrently from many tasks.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Create a store from a Redis URL (e.g. `redis://127.0.0.1:6379/0`).
    ///
    /// Fails only on an invalid URL; connections are established lazily
    /// per operation.
    pub fn from_url(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| MimirError::Configuration(format!("invalid Redis URL: {e}")))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| MimirError::Store(format!("Redis connection error: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut con = self.connection().await?;
        con.get(key)
            .await
            .map_err(|e| MimirError::Store(format!("Redis GET error: {e}")))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut con = self.connection().await?;
        con.set_ex::<_, _, ()>(key, value, ttl_secs(ttl))
            .await
            .map_err(|e| MimirError::Store(format!("Redis SETEX error: {e}")))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut con = self.connection().await?;
        con.incr(key, 1)
            .await
            .map_err(|e| MimirError::Store(format!("Redis INCR error: {e}")))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut con = self.connection().await?;
        con.expire::<_, ()>(key, ttl_secs(ttl) as i64)
            .await
            .map_err(|e| MimirError::Store(format!("Redis EXPIRE error: {e}")))
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)> {
        let mut con = self.connection().await?;
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut con)
            .await
            .map_err(|e| MimirError::Store(format!("Redis SCAN error: {e}")))?;
        Ok((next_cursor, keys))
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut con = self.connection().await?;
        con.del(keys)
            .await
            .map_err(|e| MimirError::Store(format!("Redis DEL error: {e}")))
    }

    async fn ping(&self) -> Result<()> {
        let mut con = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(|e| MimirError::Store(format!("Redis PING error: {e}")))?;
        Ok(())
    }
}

/// SETEX and EXPIRE reject a zero expiry, so sub-second TTLs round up
/// to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
