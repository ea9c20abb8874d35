//! Mimir error types

use std::time::Duration;

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Store errors. Caught at the cache/limiter boundary and converted
    // to no-op results there; they never reach callers of `ask`.
    #[error("store error: {0}")]
    Store(String),

    // Backend/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request rejected by admission control.
    ///
    /// Carries the configured limits so callers can report them
    /// (e.g. in a 429 body or a Retry-After hint).
    #[error("rate limit exceeded: max {max_requests} requests per {window:?}")]
    RateLimited {
        max_requests: u32,
        window: Duration,
    },

    /// The generation backend failed; carries the backend's error detail.
    #[error("generation failed: {0}")]
    Generation(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
