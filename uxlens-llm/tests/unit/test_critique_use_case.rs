//! Unit tests for CritiqueFrameUseCase

use std::sync::Arc;
use std::time::Duration;

use uxlens_llm::application::use_cases::CritiqueFrameUseCase;
use uxlens_llm::domain::{ContentBlock, CritiqueError, CritiqueParseError, LlmError, Role};

#[path = "../common/mod.rs"]
mod common;

use common::{MockLlmProvider, VALID_CRITIQUE, create_critique_request, create_test_config};

#[tokio::test]
async fn test_critique_success() {
    let provider = Arc::new(MockLlmProvider::with_json_response(VALID_CRITIQUE));
    let use_case = CritiqueFrameUseCase::new(provider.clone(), create_test_config());

    let critique = use_case.execute(&create_critique_request(3)).await.unwrap();
    assert_eq!(critique.overall_score, 72);
    assert_eq!(critique.issues[1].id, "frame3-issue1");

    let requests = provider.captured_requests.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.json_mode);
    assert_eq!(request.model.as_deref(), Some("test-model"));
    assert_eq!(request.max_tokens, Some(2048));
    assert_eq!(request.messages[0].role, Role::System);
    assert!(request.system_text().unwrap().contains("Consistency and standards"));

    // text-only provider gets the image as a link
    let user = &request.messages[1];
    assert!(!user.has_image());
    assert!(user.text().contains("https://images.example.com/frame-1.png"));
}

#[tokio::test]
async fn test_vision_provider_receives_image_block() {
    let provider = Arc::new(MockLlmProvider::with_json_response(VALID_CRITIQUE).with_vision());
    let use_case = CritiqueFrameUseCase::new(provider.clone(), create_test_config());

    use_case.execute(&create_critique_request(0)).await.unwrap();

    let requests = provider.captured_requests.lock().await;
    let user = &requests[0].messages[1];
    assert!(user.has_image());
    assert!(user.content.iter().any(|block| matches!(
        block,
        ContentBlock::Image { url, .. } if url == "https://images.example.com/frame-1.png"
    )));
}

#[tokio::test]
async fn test_malformed_output_is_a_parse_error() {
    let provider = Arc::new(MockLlmProvider::with_json_response(
        "The screen looks good overall, nice work!",
    ));
    let use_case = CritiqueFrameUseCase::new(provider, create_test_config());

    let err = use_case
        .execute(&create_critique_request(0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CritiqueError::Parse(CritiqueParseError::InvalidJson { .. })
    ));
    assert!(err.detail().contains("raw: The screen looks good overall"));
}

#[tokio::test]
async fn test_provider_error_is_not_retried() {
    let provider = Arc::new(
        MockLlmProvider::new().with_error(LlmError::ServiceUnavailable("overloaded".into())),
    );
    let use_case = CritiqueFrameUseCase::new(provider.clone(), create_test_config());

    let err = use_case
        .execute(&create_critique_request(0))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CritiqueError::Provider(LlmError::ServiceUnavailable("overloaded".into()))
    );
    assert_eq!(provider.captured_requests.lock().await.len(), 1);
}

#[tokio::test]
async fn test_empty_response() {
    let provider = Arc::new(MockLlmProvider::with_json_response("   "));
    let use_case = CritiqueFrameUseCase::new(provider, create_test_config());

    let err = use_case
        .execute(&create_critique_request(0))
        .await
        .unwrap_err();
    assert_eq!(err, CritiqueError::EmptyResponse);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out() {
    let provider = Arc::new(
        MockLlmProvider::with_json_response(VALID_CRITIQUE).with_delay(Duration::from_secs(120)),
    );
    let mut config = create_test_config();
    config.timeout_seconds = 5;
    let use_case = CritiqueFrameUseCase::new(provider, config);

    let err = use_case
        .execute(&create_critique_request(0))
        .await
        .unwrap_err();

    assert_eq!(err, CritiqueError::TimedOut { seconds: 5 });
    assert_eq!(err.detail(), "Critique did not finish within 5s");
}
