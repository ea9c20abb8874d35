//! The ask orchestrator.
//!
//! Sequences one inbound request through admission control, the response
//! cache, and the generation backend:
//!
//! ```text
//! check limit ──► rejected
//!      │
//! check cache ──► cached reply (no budget consumed)
//!      │
//! consume budget ──► generate ──► persist (best-effort) ──► reply
//!                        │
//!                        └──► generation failure (nothing cached)
//! ```
//!
//! Only requests that reach the backend consume rate-limit budget: a
//! rejected request was never admitted, and a cache hit costs the
//! backend nothing.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, instrument};

use crate::cache::ResponseCache;
use crate::limiter::RateLimiter;
use crate::providers::TextGenerator;
use crate::types::{AskRequest, AskResponse, CachedAnswer};
use crate::{telemetry, MimirError, Result};

/// Gateway handling the limiter → cache → backend flow.
///
/// One instance holds the process-wide cache and limiter over a single
/// shared store handle; hand it to request-handling tasks as an
/// `Arc<AskGateway>`. All state lives in the external store, so
/// concurrent `ask` calls synchronise only there. The check-then-
/// increment sequence is not atomic as a whole: a concurrent burst can
/// transiently admit a few requests past the limit, which is accepted.
pub struct AskGateway {
    cache: ResponseCache,
    limiter: RateLimiter,
    backend: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for AskGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AskGateway").finish_non_exhaustive()
    }
}

impl AskGateway {
    pub(crate) fn new(
        cache: ResponseCache,
        limiter: RateLimiter,
        backend: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            cache,
            limiter,
            backend,
        }
    }

    /// Answer a request, from cache when possible.
    ///
    /// `identifier` is the caller-supplied rate-limit identity, opaque
    /// to this layer (typically the client's network address).
    ///
    /// # Errors
    ///
    /// - [`MimirError::RateLimited`] when the identifier has exhausted
    ///   its window budget; carries the configured limits.
    /// - [`MimirError::Generation`] when the backend call fails; carries
    ///   the backend's error detail. Nothing is cached and the consumed
    ///   budget is not refunded.
    ///
    /// Store failures never surface here: the cache degrades to misses
    /// and the limiter fails open.
    #[instrument(skip(self, request), fields(model = %request.model, mode = %request.mode))]
    pub async fn ask(&self, request: &AskRequest, identifier: &str) -> Result<AskResponse> {
        let start = Instant::now();

        let (allowed, _count) = self.limiter.check(identifier).await;
        if !allowed {
            let policy = self.limiter.policy();
            metrics::counter!(telemetry::RATE_LIMITED_TOTAL).increment(1);
            Self::record_request("rejected", start);
            return Err(MimirError::RateLimited {
                max_requests: policy.max_requests,
                window: policy.window,
            });
        }

        if let Some(answer) = self
            .cache
            .get(&request.model, &request.prompt, request.mode)
            .await
        {
            Self::record_request("hit", start);
            return Ok(Self::reply(request, answer));
        }

        // Budget is consumed exactly when a request proceeds to the
        // backend; the returned count gates nothing.
        self.limiter.increment(identifier).await;

        let full_prompt = request.mode.instruct(&request.prompt);
        match self.backend.generate(&request.model, &full_prompt).await {
            Ok(generated) => {
                let answer = CachedAnswer::from(generated);
                // Best-effort write; a failed put only costs future hits.
                self.cache
                    .put(&request.model, &request.prompt, &answer, request.mode, None)
                    .await;
                Self::record_request("generated", start);
                Ok(Self::reply(request, answer))
            }
            Err(e) => {
                error!(backend = self.backend.name(), error = %e, "generation failed");
                Self::record_request("error", start);
                Err(MimirError::Generation(e.to_string()))
            }
        }
    }

    /// Delete cached answers matching `pattern` (default `llm:*`);
    /// returns the number deleted, 0 on store failure.
    pub async fn clear_cache(&self, pattern: Option<&str>) -> u64 {
        self.cache.clear(pattern).await
    }

    /// Probe the shared store's liveness.
    pub async fn store_healthy(&self) -> bool {
        self.cache.health().await
    }

    /// The configured admission policy.
    pub fn rate_limit_policy(&self) -> crate::RateLimitPolicy {
        self.limiter.policy()
    }

    /// The TTL applied to newly cached answers.
    pub fn cache_ttl(&self) -> std::time::Duration {
        self.cache.default_ttl()
    }

    fn reply(request: &AskRequest, answer: CachedAnswer) -> AskResponse {
        AskResponse {
            model: request.model.clone(),
            response: answer.response,
            created_at: answer.created_at,
            done: answer.done,
            mode: request.mode,
        }
    }

    fn record_request(status: &'static str, start: Instant) {
        metrics::counter!(telemetry::REQUESTS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }
}
