//! Tests for gateway construction — URL validation, dependency
//! injection, and environment configuration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mimir::providers::TextGenerator;
use mimir::store::MemoryStore;
use mimir::types::GeneratedText;
use mimir::{AskGateway, Mimir, MimirBuilder, MimirError, RateLimitPolicy, Result};

struct OkBackend;

#[async_trait]
impl TextGenerator for OkBackend {
    fn name(&self) -> &str {
        "ok"
    }

    async fn generate(&self, _model: &str, _prompt: &str) -> Result<GeneratedText> {
        Ok(GeneratedText {
            response: "fine".to_string(),
            created_at: String::new(),
            done: true,
        })
    }
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn invalid_redis_url_fails_with_configuration_error() {
    let err = Mimir::builder().redis_url("not a url").build().unwrap_err();
    assert!(matches!(err, MimirError::Configuration(_)));
}

#[test]
fn builder_is_exposed_on_the_gateway_type() {
    let gateway = AskGateway::builder()
        .store(Arc::new(MemoryStore::new()))
        .backend(Arc::new(OkBackend))
        .build()
        .unwrap();

    assert_eq!(gateway.rate_limit_policy(), RateLimitPolicy::default());
    assert_eq!(gateway.cache_ttl(), Duration::from_secs(3600));
}

#[test]
fn explicit_settings_land_in_the_gateway() {
    let gateway = Mimir::builder()
        .store(Arc::new(MemoryStore::new()))
        .backend(Arc::new(OkBackend))
        .cache_ttl(Duration::from_secs(30))
        .rate_limit(RateLimitPolicy::new().max_requests(2).window(Duration::from_secs(5)))
        .build()
        .unwrap();

    assert_eq!(gateway.cache_ttl(), Duration::from_secs(30));
    assert_eq!(gateway.rate_limit_policy().max_requests, 2);
    assert_eq!(gateway.rate_limit_policy().window, Duration::from_secs(5));
}

// =========================================================================
// Environment configuration
// =========================================================================

// All environment mutation lives in this one test; tests in a binary run
// concurrently and process environment is shared.
#[test]
fn from_env_applies_variables_and_falls_back_when_unparsable() {
    std::env::set_var("REDIS_URL", "not a url");
    std::env::set_var("CACHE_TTL", "120");
    std::env::set_var("RATE_LIMIT_WINDOW", "5");
    std::env::set_var("RATE_LIMIT_MAX", "3");

    // REDIS_URL was read: the unparsable URL surfaces at build.
    let err = MimirBuilder::from_env()
        .backend(Arc::new(OkBackend))
        .build()
        .unwrap_err();
    assert!(matches!(err, MimirError::Configuration(_)));

    // The numeric variables land in the TTL and the policy.
    let gateway = MimirBuilder::from_env()
        .store(Arc::new(MemoryStore::new()))
        .backend(Arc::new(OkBackend))
        .build()
        .unwrap();
    assert_eq!(gateway.cache_ttl(), Duration::from_secs(120));
    assert_eq!(gateway.rate_limit_policy().window, Duration::from_secs(5));
    assert_eq!(gateway.rate_limit_policy().max_requests, 3);

    // Unparsable values fall back to the defaults.
    std::env::set_var("CACHE_TTL", "soon");
    std::env::set_var("RATE_LIMIT_WINDOW", "a while");
    std::env::set_var("RATE_LIMIT_MAX", "lots");
    let gateway = MimirBuilder::from_env()
        .store(Arc::new(MemoryStore::new()))
        .backend(Arc::new(OkBackend))
        .build()
        .unwrap();
    assert_eq!(gateway.cache_ttl(), Duration::from_secs(3600));
    assert_eq!(gateway.rate_limit_policy(), RateLimitPolicy::default());

    for name in ["REDIS_URL", "CACHE_TTL", "RATE_LIMIT_WINDOW", "RATE_LIMIT_MAX"] {
        std::env::remove_var(name);
    }
}
