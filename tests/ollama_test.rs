//! Integration tests for [`OllamaClient`] against a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mimir::providers::{OllamaClient, TextGenerator};
use mimir::MimirError;

#[tokio::test]
async fn generate_parses_a_successful_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "AI is artificial intelligence.",
            "created_at": "2024-06-01T12:00:00Z",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let generated = client.generate("llama3.2", "What is AI?").await.unwrap();

    assert_eq!(generated.response, "AI is artificial intelligence.");
    assert_eq!(generated.created_at, "2024-06-01T12:00:00Z");
    assert!(generated.done);
}

#[tokio::test]
async fn generate_sends_the_prompt_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "prompt": "Be brief:\n\nWhat is AI?",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok",
            "created_at": "",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    client
        .generate("llama3.2", "Be brief:\n\nWhat is AI?")
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("model 'missing' not found"),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let err = client.generate("missing", "hello").await.unwrap_err();

    match err {
        MimirError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("not found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_becomes_http_error() {
    // Nothing listens on this port.
    let client = OllamaClient::with_base_url("http://127.0.0.1:1");
    let err = client.generate("llama3.2", "hello").await.unwrap_err();
    assert!(matches!(err, MimirError::Http(_)));
}

#[tokio::test]
async fn undecodable_body_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let err = client.generate("llama3.2", "hello").await.unwrap_err();
    assert!(matches!(err, MimirError::Http(_)));
}

#[tokio::test]
async fn missing_optional_fields_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "partial",
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(server.uri());
    let generated = client.generate("llama3.2", "hello").await.unwrap();

    assert_eq!(generated.response, "partial");
    assert_eq!(generated.created_at, "");
    assert!(!generated.done);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::with_base_url(format!("{}/", server.uri()));
    client.generate("llama3.2", "hello").await.unwrap();
}
