//! Response caching: key derivation and the store-backed cache.

mod key;
mod response;

pub use key::derive_key;
pub use response::ResponseCache;

/// Default time-to-live for cached answers (1 hour).
pub const DEFAULT_CACHE_TTL: std::time::Duration = std::time::Duration::from_secs(3600);

/// Key pattern matching every cached answer.
pub const CACHE_KEY_PATTERN: &str = "llm:*";
