//! Integration tests for GoogleAIProvider using wiremock

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uxlens_llm::domain::{CompletionRequest, LlmError, LlmProvider, Message};
use uxlens_llm::infrastructure::providers::GoogleAIProvider;

fn create_provider(mock_server: &MockServer) -> GoogleAIProvider {
    GoogleAIProvider::new("test-api-key", "test-model")
        .with_base_url(mock_server.uri())
        .with_timeout(10)
}

fn create_test_request() -> CompletionRequest {
    CompletionRequest::new()
        .with_model("test-model")
        .with_system("You review screens.")
        .with_message(Message::user("Review this screen").with_image("https://img.example.com/a.png"))
        .with_max_tokens(100)
        .with_temperature(0.2)
        .with_json_mode(true)
}

fn candidate_body(text: &str, finish_reason: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [ { "text": text } ] },
            "finishReason": finish_reason
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 8,
            "totalTokenCount": 18
        }
    })
}

#[tokio::test]
async fn test_google_ai_provider_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(query_param("key", "test-api-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body("{\"overall_score\": 80}", "STOP")),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let response = provider.complete(create_test_request()).await.unwrap();

    assert_eq!(response.model, "test-model");
    assert_eq!(response.text(), "{\"overall_score\": 80}");
    assert_eq!(response.usage.total_tokens, 18);
    assert!(!response.is_truncated());
}

#[tokio::test]
async fn test_google_ai_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "systemInstruction": { "parts": [ { "text": "You review screens." } ] },
            "generationConfig": { "responseMimeType": "application/json", "maxOutputTokens": 100 },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": "Review this screen" },
                    { "fileData": { "mimeType": "image/png", "fileUri": "https://img.example.com/a.png" } }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{}", "STOP")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    assert!(provider.complete(create_test_request()).await.is_ok());
}

#[tokio::test]
async fn test_google_ai_provider_max_tokens_is_truncated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body("{\"overall", "MAX_TOKENS")),
        )
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let response = provider.complete(create_test_request()).await.unwrap();
    assert!(response.is_truncated());
}

#[tokio::test]
async fn test_google_ai_provider_blocked_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let err = provider.complete(create_test_request()).await.unwrap_err();
    assert_eq!(
        err,
        LlmError::ContentFiltered {
            reason: "SAFETY".into()
        }
    );
}

#[tokio::test]
async fn test_google_ai_provider_api_error_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(query_param("key", "test-api-key"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {
                "message": "Rate limit exceeded",
                "code": "rate_limit_exceeded"
            }
        })))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let error = provider.complete(create_test_request()).await.unwrap_err();
    assert!(error.is_rate_limited());
    assert!(error.to_string().contains("Rate limited"));
}

#[tokio::test]
async fn test_google_ai_provider_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Internal server error"
        })))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let result = provider.complete(create_test_request()).await;
    assert!(matches!(result, Err(LlmError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn test_google_ai_provider_unknown_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    let result = provider.complete(create_test_request()).await;
    assert_eq!(result.unwrap_err(), LlmError::ModelNotFound("test-model".into()));
}

#[tokio::test]
async fn test_google_ai_provider_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let provider = create_provider(&mock_server);
    assert!(provider.complete(create_test_request()).await.is_err());
}
