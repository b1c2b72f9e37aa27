//! Integration tests for OpenAIProvider (OpenAI and Azure OpenAI) using wiremock

use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uxlens_llm::domain::{CompletionRequest, LlmError, LlmProvider, Message, StopReason};
use uxlens_llm::infrastructure::providers::OpenAIProvider;

fn create_test_request() -> CompletionRequest {
    CompletionRequest::new()
        .with_system("You review screens.")
        .with_message(Message::user("Review this screen").with_image("https://img.example.com/a.png"))
        .with_max_tokens(256)
        .with_json_mode(true)
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "model": "gpt-4o-mini",
        "created": 1700000000,
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30 }
    })
}

#[tokio::test]
async fn test_openai_complete_sends_image_parts_and_json_mode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": "You review screens." },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "Review this screen" },
                        { "type": "image_url", "image_url": { "url": "https://img.example.com/a.png" } }
                    ]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("{\"overall_score\": 64}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("sk-test", "gpt-4o-mini").with_base_url(mock_server.uri());
    let response = provider.complete(create_test_request()).await.unwrap();

    assert_eq!(response.id, "chatcmpl-123");
    assert_eq!(response.text(), "{\"overall_score\": 64}");
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.total_tokens, 30);
}

#[tokio::test]
async fn test_azure_uses_deployment_url_and_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/critique-4o/chat/completions"))
        .and(query_param("api-version", "2024-02-15-preview"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::azure(mock_server.uri(), "azure-key", "critique-4o", "");
    assert!(provider.complete(create_test_request()).await.is_ok());
}

#[tokio::test]
async fn test_openai_rate_limit_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "12")
                .set_body_string("slow down"),
        )
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("sk-test", "gpt-4o-mini").with_base_url(mock_server.uri());
    let err = provider.complete(create_test_request()).await.unwrap_err();

    assert_eq!(err, LlmError::rate_limited_with_retry("slow down", 12));
}

#[tokio::test]
async fn test_openai_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("sk-bad", "gpt-4o-mini").with_base_url(mock_server.uri());
    let err = provider.complete(create_test_request()).await.unwrap_err();
    assert_eq!(err, LlmError::Authentication("invalid api key".into()));
}

#[tokio::test]
async fn test_openai_empty_choices_yield_empty_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-empty",
            "model": "gpt-4o-mini",
            "choices": []
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::new("sk-test", "gpt-4o-mini").with_base_url(mock_server.uri());
    let response = provider.complete(create_test_request()).await.unwrap();
    assert!(response.text().is_empty());
    assert_eq!(response.stop_reason, StopReason::Other);
}
