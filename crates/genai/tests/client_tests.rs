//! Integration tests for the REST-backed generative model.
//!
//! Runs [`GeminiClient`] against a local `wiremock` server standing in for
//! the generative-AI service.

use assert_matches::assert_matches;
use loci_core::{CoreError, DataUrl};
use loci_genai::{GeminiClient, GenAiApiError, GenAiConfig, GenAiError, GenerativeModel, Part};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeminiClient {
    let mut config = GenAiConfig::new("test-key");
    config.api_url = server.uri();
    config.text_model = "text-model".to_string();
    config.image_model = "image-model".to_string();
    GeminiClient::from_config(&config).expect("client should build")
}

// ---------------------------------------------------------------------------
// Structured text
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_json_sends_schema_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-model:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"title\":\"Kitchen\"}"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .generate_json(vec![Part::text("hi")], json!({"type": "OBJECT"}))
        .await
        .unwrap();

    assert_eq!(text, "{\"title\":\"Kitchen\"}");
}

#[tokio::test]
async fn generate_json_without_text_is_content_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_json(vec![Part::text("hi")], json!({}))
        .await
        .unwrap_err();

    assert_matches!(err, GenAiError::Core(CoreError::Content(msg)) if msg.contains("SAFETY"));
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_image_returns_inline_data_and_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/image-model:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseModalities": ["IMAGE", "TEXT"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "A panorama"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
            ]}}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .generate_image(vec![
            Part::inline(DataUrl::new("image/jpeg", "/9j/")),
            Part::text("edit"),
        ])
        .await
        .unwrap();

    assert_eq!(
        response.image,
        Some(DataUrl::new("image/png", "iVBORw0KGgo="))
    );
    assert_eq!(response.text.as_deref(), Some("A panorama"));
}

#[tokio::test]
async fn generate_image_without_image_part_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/image-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot draw that"}]}}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.generate_image(vec![Part::text("x")]).await.unwrap();

    assert!(response.image.is_none());
    assert_eq!(response.text.as_deref(), Some("I cannot draw that"));
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_image(vec![Part::text("x")]).await.unwrap_err();

    assert_matches!(
        err,
        GenAiError::Api(GenAiApiError::ApiError { status: 429, body }) if body == "quota exceeded"
    );
}

#[tokio::test]
async fn undecodable_body_surfaces_as_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_json(vec![Part::text("x")], json!({}))
        .await
        .unwrap_err();

    assert_matches!(err, GenAiError::Api(GenAiApiError::Decode(_)));
}
