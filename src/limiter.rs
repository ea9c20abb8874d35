//! Fixed-window rate limiting backed by the shared key-value store.
//!
//! Each caller identifier owns one counter under `rate_limit:{id}`. The
//! counter is created at 1 with an expiry equal to the window length,
//! incremented (without touching the expiry) for the rest of the window,
//! and destroyed only by expiry. The window is a hard cliff: a request
//! just before expiry and one just after may be arbitrarily close in
//! real time, so short bursts near the boundary can exceed the nominal
//! rate. That coarseness is a documented property of the fixed-window
//! scheme, not a bug.
//!
//! On store failure the limiter fails OPEN and admits the request:
//! availability is prioritised over strict enforcement when the store
//! is unreachable.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::store::KeyValueStore;
use crate::{telemetry, MimirError};

/// Fixed-window admission policy, fixed for the gateway's lifetime.
///
/// ```rust
/// # use mimir::RateLimitPolicy;
/// # use std::time::Duration;
/// let policy = RateLimitPolicy::new()
///     .window(Duration::from_secs(60))
///     .max_requests(10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Window length. Default: 60 seconds.
    pub window: Duration,
    /// Maximum requests admitted per window. Default: 10.
    pub max_requests: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 10,
        }
    }
}

impl RateLimitPolicy {
    /// Create a policy with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the maximum requests per window.
    pub fn max_requests(mut self, max: u32) -> Self {
        self.max_requests = max;
        self
    }
}

/// Per-identifier fixed-window request counter.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    /// Create a limiter over `store` with the given policy.
    pub fn new(store: Arc<dyn KeyValueStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// The configured policy.
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Check whether `identifier` is within its budget.
    ///
    /// Returns `(allowed, current_count)`. An absent counter counts as
    /// 0. Does not consume budget — pair with [`increment`](Self::increment)
    /// for requests that go on to the backend. Fails open on store
    /// failure: `(true, 0)`.
    pub async fn check(&self, identifier: &str) -> (bool, u32) {
        let key = Self::counter_key(identifier);
        match self.store.get(&key).await {
            Ok(raw) => {
                let count = raw.and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
                (count < self.policy.max_requests, count)
            }
            Err(e) => {
                Self::record_store_error(&e, "check");
                (true, 0)
            }
        }
    }

    /// Consume one unit of budget for `identifier`.
    ///
    /// Atomically increments the counter, creating it at 1. The expiry
    /// is set exactly once, when the increment created the counter, and
    /// never refreshed afterwards, which is what makes the window fixed
    /// rather than sliding. Returns the new count, or 0 when either
    /// store call fails (no error is raised).
    pub async fn increment(&self, identifier: &str) -> i64 {
        let key = Self::counter_key(identifier);
        let count = match self.store.incr(&key).await {
            Ok(count) => count,
            Err(e) => {
                Self::record_store_error(&e, "increment");
                return 0;
            }
        };
        if count == 1 {
            if let Err(e) = self.store.expire(&key, self.policy.window).await {
                // The counter was created without an expiry and will not
                // reset on its own.
                Self::record_store_error(&e, "increment");
                return 0;
            }
        }
        count
    }

    fn counter_key(identifier: &str) -> String {
        format!("rate_limit:{identifier}")
    }

    fn record_store_error(error: &MimirError, operation: &str) {
        warn!(%error, operation, "limiter store operation failed, failing open");
        metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "component" => "limiter").increment(1);
    }
}
