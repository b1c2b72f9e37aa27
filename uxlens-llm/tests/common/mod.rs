//! Common test utilities and mock implementations
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uxlens_core::config::{
    AzureOpenAIConfig, GoogleAIConfig, LlmConfig, LlmResilienceConfig, OpenAIConfig,
};
use uxlens_core::domain::{ComplianceLevel, FrameAccessibility, TextAccessibility};
use uxlens_llm::domain::{
    CompletionRequest, CompletionResponse, ContentBlock, CritiqueRequest, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, StopReason, Usage,
};

/// Mock LLM provider for testing
pub struct MockLlmProvider {
    /// Response to return from complete()
    pub response: Option<CompletionResponse>,
    /// Error to return (if any)
    pub error: Option<LlmError>,
    /// Delay before answering
    pub delay: Option<Duration>,
    pub vision: bool,
    /// Captured requests for verification
    pub captured_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            response: None,
            error: None,
            delay: None,
            vision: false,
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, response: CompletionResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_error(mut self, error: LlmError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_vision(mut self) -> Self {
        self.vision = true;
        self
    }

    pub fn with_json_response(content: &str) -> Self {
        Self::new().with_response(create_completion_response(content))
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn info(&self) -> ProviderInfo {
        let capabilities = if self.vision {
            ProviderCapabilities::multimodal(8192, 2048)
        } else {
            ProviderCapabilities::text_only(8192, 2048)
        };
        ProviderInfo {
            id: "mock",
            name: "Mock Provider",
            version: "test",
            capabilities,
        }
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.captured_requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.response
            .clone()
            .ok_or_else(|| LlmError::Other("No response configured".to_string()))
    }
}

/// Create a standard LLM response with given content
pub fn create_completion_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        id: "test-response-id".to_string(),
        model: "test-model".to_string(),
        content: vec![ContentBlock::text(content)],
        stop_reason: StopReason::EndTurn,
        usage: Usage {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
        },
        created: Some(1234567890),
    }
}

/// Create default test LlmConfig
pub fn create_test_config() -> LlmConfig {
    LlmConfig {
        provider: "google_ai".to_string(),
        google_ai: GoogleAIConfig {
            api_key: Some("test-api-key".to_string()),
            base_url: "https://test.api.example.com".to_string(),
        },
        openai: OpenAIConfig {
            api_key: Some("test-openai-key".to_string()),
            base_url: "https://api.openai.com/v1".to_string(),
            organization_id: None,
        },
        azure: AzureOpenAIConfig {
            endpoint: String::new(),
            api_key: None,
            deployment: String::new(),
            api_version: "2024-02-15-preview".to_string(),
        },
        default_model: "test-model".to_string(),
        temperature: 0.2,
        max_tokens: 2048,
        timeout_seconds: 30,
        resilience: LlmResilienceConfig {
            enabled: false,
            ..Default::default()
        },
    }
}

fn text_row(node_id: &str, text: &str, ratio: f64, level: ComplianceLevel) -> TextAccessibility {
    TextAccessibility {
        node_id: node_id.to_string(),
        text: text.to_string(),
        font_size: 14.0,
        bold: false,
        foreground: "#777777".to_string(),
        background: "#FFFFFF".to_string(),
        ratio,
        score: 50,
        level,
        large_text: false,
    }
}

/// A sign-in screen with one failing and one passing text layer
pub fn create_critique_request(frame_index: u32) -> CritiqueRequest {
    CritiqueRequest {
        frame_index,
        frame_name: "Sign in".to_string(),
        image_url: "https://images.example.com/frame-1.png".to_string(),
        snapshot: serde_json::json!({"persona": "first-time shopper"}),
        accessibility: FrameAccessibility {
            average_score: 75,
            texts: vec![
                text_row("1:2", "Forgot password?", 2.33, ComplianceLevel::LowContrast),
                text_row("1:3", "Welcome back", 12.5, ComplianceLevel::Aaa),
            ],
        },
        elements: Vec::new(),
        theme_keywords: vec!["login".to_string()],
    }
}

pub const VALID_CRITIQUE: &str = r#"{
    "overall_score": 72,
    "summary": "Clear layout with a weak secondary link.",
    "strengths": ["Single primary action"],
    "weaknesses": ["Low contrast helper text"],
    "issues": [
        {"heuristic": "4", "severity": "high", "message": "Forgot password link fails contrast", "suggestion": "Darken to #555555"},
        {"heuristic": "H8", "severity": "LOW", "description": "Decorative divider adds noise"}
    ],
    "category_scores": {"accessibility": 55, "layout": "80"},
    "resources": [{"title": "WCAG contrast", "url": "https://www.w3.org/TR/WCAG21/#contrast-minimum"}]
}"#;
