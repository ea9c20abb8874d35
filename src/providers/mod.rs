//! Generation backend seam and implementations.

mod ollama;

use async_trait::async_trait;

use crate::types::GeneratedText;
use crate::Result;

pub use ollama::OllamaClient;

/// A text-generation backend.
///
/// The gateway treats any error from [`generate`](Self::generate)
/// uniformly as a generation failure; the backend's own retry or
/// fallback behaviour, if any, is its own concern.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name, for logs and metrics.
    fn name(&self) -> &str;

    /// Generate text with `model` for the given (already composed)
    /// prompt.
    async fn generate(&self, model: &str, prompt: &str) -> Result<GeneratedText>;
}
