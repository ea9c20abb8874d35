//! Mimir - caching and rate-limiting decision layer for text-generation
//! gateways
//!
//! This crate implements the layer between a public request handler and
//! a generation backend: it admits or rejects requests with a
//! per-identifier fixed-window rate limit, serves previously computed
//! answers from a Redis-backed cache, and otherwise forwards the request
//! to the backend and persists the result for reuse. HTTP wiring,
//! schema validation, and process startup are the caller's concern; the
//! narrow interface is [`AskGateway::ask`].
//!
//! # Example
//!
//! ```rust,no_run
//! use mimir::{AskRequest, AskMode, Mimir};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let gateway = Mimir::builder()
//!         .redis_url("redis://127.0.0.1:6379/0")
//!         .ollama("http://localhost:11434")
//!         .build()?;
//!
//!     let request = AskRequest::new("llama3.2", "What is AI?").mode(AskMode::Concise);
//!     let reply = gateway.ask(&request, "10.0.0.1").await?;
//!
//!     println!("{}", reply.response);
//!     Ok(())
//! }
//! ```
//!
//! # Failure policy
//!
//! Store failures are absorbed at the component boundary, asymmetrically
//! and on purpose: the cache degrades to a no-op (no hits, no writes,
//! never an error), while the limiter fails open (every request
//! admitted). Only two outcomes surface to callers as errors:
//! [`MimirError::RateLimited`] and [`MimirError::Generation`].

pub mod cache;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod providers;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{MimirError, Result};
pub use gateway::{AskGateway, Mimir, MimirBuilder};
pub use limiter::{RateLimitPolicy, RateLimiter};

// Re-export all types
pub use types::{AskMode, AskRequest, AskResponse, CachedAnswer, GeneratedText};
