//! Builder for configuring gateway instances.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ResponseCache, DEFAULT_CACHE_TTL};
use crate::limiter::{RateLimitPolicy, RateLimiter};
use crate::providers::{OllamaClient, TextGenerator};
use crate::store::{KeyValueStore, RedisStore};
use crate::Result;

use super::AskGateway;

/// Default Redis URL when none is configured.
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Crate-named alias for [`AskGateway`]; `Mimir::builder()` is the
/// conventional entry point.
pub type Mimir = AskGateway;

impl AskGateway {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> MimirBuilder {
        MimirBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// The store and backend can each be either configured by URL (Redis
/// and Ollama respectively) or injected directly as trait objects,
/// which is how tests substitute in-memory stores and scripted
/// backends.
pub struct MimirBuilder {
    redis_url: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
    ollama_url: Option<String>,
    backend: Option<Arc<dyn TextGenerator>>,
    cache_ttl: Duration,
    rate_limit: RateLimitPolicy,
    backend_timeout: Option<Duration>,
}

impl MimirBuilder {
    pub fn new() -> Self {
        Self {
            redis_url: None,
            store: None,
            ollama_url: None,
            backend: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            rate_limit: RateLimitPolicy::default(),
            backend_timeout: None,
        }
    }

    /// Read configuration from the environment, falling back to the
    /// builder defaults for anything unset or unparsable:
    /// `REDIS_URL`, `OLLAMA_HOST`, `CACHE_TTL` (seconds),
    /// `RATE_LIMIT_WINDOW` (seconds), `RATE_LIMIT_MAX`.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(url) = std::env::var("REDIS_URL") {
            builder.redis_url = Some(url);
        }
        if let Ok(url) = std::env::var("OLLAMA_HOST") {
            builder.ollama_url = Some(url);
        }
        if let Some(secs) = env_u64("CACHE_TTL") {
            builder.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("RATE_LIMIT_WINDOW") {
            builder.rate_limit.window = Duration::from_secs(secs);
        }
        if let Some(max) = env_u64("RATE_LIMIT_MAX") {
            builder.rate_limit.max_requests = max as u32;
        }
        builder
    }

    /// Set the Redis URL (default: `redis://127.0.0.1:6379/0`).
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Inject a store directly, bypassing Redis configuration.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the Ollama base URL (default: `http://localhost:11434`).
    pub fn ollama(mut self, url: impl Into<String>) -> Self {
        self.ollama_url = Some(url.into());
        self
    }

    /// Inject a generation backend directly, bypassing Ollama
    /// configuration.
    pub fn backend(mut self, backend: Arc<dyn TextGenerator>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the default TTL for cached answers (default: 1 hour).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the admission policy (default: 10 requests per 60 seconds).
    pub fn rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    /// Set the HTTP timeout for backend calls (default: 120 seconds).
    ///
    /// Applies only when the backend is an Ollama client built here,
    /// not to injected backends.
    pub fn backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = Some(timeout);
        self
    }

    /// Build the gateway.
    ///
    /// Fails with [`MimirError::Configuration`](crate::MimirError::Configuration)
    /// if the Redis URL cannot be parsed; connections themselves are
    /// established lazily, per operation.
    pub fn build(self) -> Result<AskGateway> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => {
                let url = self.redis_url.as_deref().unwrap_or(DEFAULT_REDIS_URL);
                Arc::new(RedisStore::from_url(url)?)
            }
        };

        let backend: Arc<dyn TextGenerator> = match self.backend {
            Some(backend) => backend,
            None => {
                let url = self
                    .ollama_url
                    .unwrap_or_else(|| OllamaClient::DEFAULT_BASE_URL.to_owned());
                let client = match self.backend_timeout {
                    Some(timeout) => OllamaClient::with_timeout(url, timeout),
                    None => OllamaClient::with_base_url(url),
                };
                Arc::new(client)
            }
        };

        let cache = ResponseCache::with_ttl(store.clone(), self.cache_ttl);
        let limiter = RateLimiter::new(store, self.rate_limit);
        Ok(AskGateway::new(cache, limiter, backend))
    }
}

impl Default for MimirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
