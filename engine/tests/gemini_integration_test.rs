//! Gemini provider tests against a mocked generateContent endpoint.

use quill_engine::config::GeminiConfig;
use quill_engine::llm::gemini::GeminiProvider;
use quill_engine::llm::{LLMError, LLMProvider, Message};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        base_url: server.uri(),
        model: "gemini-1.5-pro".to_string(),
    };
    GeminiProvider::new(config, "test-key".to_string())
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{"text": text}]
            }
        }]
    })
}

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body(
            "Sure! [CREATE_FILE:notes.txt] is on its way.",
        )))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let reply = provider
        .generate(&[Message::user("make notes.txt")])
        .await
        .unwrap();

    assert_eq!(reply, "Sure! [CREATE_FILE:notes.txt] is on its way.");
}

#[tokio::test]
async fn test_generate_concatenates_multiple_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "first "}, {"text": "second"}]
                }
            }]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let reply = provider.generate(&[Message::user("hi")]).await.unwrap();
    assert_eq!(reply, "first second");
}

#[tokio::test]
async fn test_system_message_becomes_system_instruction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider
        .generate(&[
            Message::system("You are an AI coding assistant."),
            Message::user("hello"),
            Message::assistant("hi"),
            Message::user("again"),
        ])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();

    // System prompt travels as systemInstruction, not as a content entry
    assert!(body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("coding assistant"));

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["role"], "user");
}

#[tokio::test]
async fn test_rate_limit_maps_to_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("hi")]).await;
    assert!(matches!(result, Err(LLMError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_auth_failure_maps_to_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("hi")]).await;
    assert!(matches!(result, Err(LLMError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn test_missing_candidates_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider.generate(&[Message::user("hi")]).await;
    assert!(matches!(result, Err(LLMError::ParseError(_))));
}
