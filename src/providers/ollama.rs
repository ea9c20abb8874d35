//! Ollama HTTP client implementing [`TextGenerator`].
//!
//! Speaks the `/api/generate` endpoint in non-streaming mode.
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::types::GeneratedText;
use crate::{MimirError, Result};

use super::TextGenerator;

/// Default request timeout. Generation can be slow on small hardware.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    done: bool,
}

/// Client for an Ollama-compatible generation server.
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    /// Base URL for a local Ollama server.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    /// Create a client against the default local server.
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (also used in tests with
    /// wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<GeneratedText> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MimirError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        Ok(GeneratedText {
            response: reply.response,
            created_at: reply.created_at,
            done: reply.done,
        })
    }
}
