//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status` — request outcome: "hit" | "generated" | "rejected" | "error"
//! - `component` — store client: "cache" | "limiter"

/// Total requests handled by the gateway.
///
/// Labels: `status` ("hit" | "generated" | "rejected" | "error").
pub const REQUESTS_TOTAL: &str = "mimir_requests_total";

/// Request duration in seconds, measured across the whole `ask` flow.
pub const REQUEST_DURATION_SECONDS: &str = "mimir_request_duration_seconds";

/// Total response-cache hits.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total response-cache misses.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total requests rejected by admission control.
pub const RATE_LIMITED_TOTAL: &str = "mimir_rate_limited_total";

/// Total store failures swallowed by the cache or limiter.
///
/// Labels: `component` ("cache" | "limiter").
pub const STORE_ERRORS_TOTAL: &str = "mimir_store_errors_total";
