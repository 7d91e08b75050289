//! Completion client contract tests.
//!
//! Verify exact HTTP format compliance for the chat-completions client:
//! request body shape, auth header, vision content blocks, and error mapping.
//! The pipeline's fallback behavior on top of these errors is covered in
//! `orchestrator_e2e.rs`.

use muse::llm::{ChatTurn, CompletionClient, CompletionRequest, HttpCompletionClient};
use muse::{ImagePayload, MuseError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpCompletionClient {
    HttpCompletionClient::new("test-key", Duration::from_secs(5))
        .expect("client build")
        .with_base_url(server.uri())
}

fn request_with(turns: Vec<ChatTurn>) -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4o-mini".into(),
        turns,
        max_tokens: 2000,
        temperature: 0.8,
    }
}

fn ok_body(text: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn request_carries_model_messages_and_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 2000,
            "temperature": 0.8,
            "messages": [
                {"role": "system", "content": "be kind"},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::system("be kind"), ChatTurn::user("hello")]);

    let reply = client.complete(&request).await.expect("completion");
    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn request_sends_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user("hi")]);
    assert!(client.complete(&request).await.is_ok());
}

#[tokio::test]
async fn vision_turn_is_a_multipart_data_url_block() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "what's this?"},
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("a photo")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user_with_image(
        "what's this?",
        ImagePayload {
            media_type: "image/jpeg".into(),
            base64_data: "QUJD".into(),
        },
    )]);
    assert!(client.complete(&request).await.is_ok());
}

#[tokio::test]
async fn server_error_maps_to_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user("hi")]);
    let err = client.complete(&request).await.expect_err("should fail");
    assert!(matches!(err, MuseError::Llm(_)));
}

#[tokio::test]
async fn auth_failure_maps_to_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user("hi")]);
    assert!(client.complete(&request).await.is_err());
}

#[tokio::test]
async fn malformed_body_maps_to_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user("hi")]);
    assert!(client.complete(&request).await.is_err());
}

#[tokio::test]
async fn missing_content_field_maps_to_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"choices": [{"message": {}}]})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = request_with(vec![ChatTurn::user("hi")]);
    let err = client.complete(&request).await.expect_err("should fail");
    assert!(err.to_string().contains("content"));
}
