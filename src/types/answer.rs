//! Cache payload and backend output types.

use serde::{Deserialize, Serialize};

/// A generation result as persisted in the response cache.
///
/// Stored as JSON under the derived cache key with a TTL. Entries are
/// immutable once written; a later write under the same key fully
/// replaces the prior value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAnswer {
    /// Generated text.
    pub response: String,
    /// Backend-reported creation timestamp, stored verbatim.
    #[serde(default)]
    pub created_at: String,
    /// Whether the backend reported the generation as complete.
    #[serde(default = "default_done")]
    pub done: bool,
}

fn default_done() -> bool {
    true
}

/// Output of a [`TextGenerator`](crate::providers::TextGenerator) call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    /// Generated text.
    pub response: String,
    /// Backend-reported creation timestamp.
    #[serde(default)]
    pub created_at: String,
    /// Whether the backend reported the generation as complete.
    #[serde(default = "default_done")]
    pub done: bool,
}

impl From<GeneratedText> for CachedAnswer {
    fn from(generated: GeneratedText) -> Self {
        Self {
            response: generated.response,
            created_at: generated.created_at,
            done: generated.done,
        }
    }
}
