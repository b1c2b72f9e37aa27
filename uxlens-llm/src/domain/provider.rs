//! LLM provider trait
//!
//! The critique step depends only on this trait; concrete backends (Google AI,
//! OpenAI, Azure OpenAI) live in the infrastructure layer.

use async_trait::async_trait;

use crate::domain::error::LlmError;
use crate::domain::messages::{CompletionRequest, CompletionResponse};

#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    /// Accepts image content blocks
    pub vision: bool,
    /// Can be told to emit JSON only
    pub json_mode: bool,
    pub max_context_tokens: u32,
    pub max_output_tokens: u32,
}

impl ProviderCapabilities {
    pub fn text_only(max_context: u32, max_output: u32) -> Self {
        Self {
            vision: false,
            json_mode: false,
            max_context_tokens: max_context,
            max_output_tokens: max_output,
        }
    }

    pub fn multimodal(max_context: u32, max_output: u32) -> Self {
        Self {
            vision: true,
            json_mode: true,
            max_context_tokens: max_context,
            max_output_tokens: max_output,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderInfo {
    /// e.g. "google_ai", "azure", "openai"
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub capabilities: ProviderCapabilities,
}

/// Core trait for LLM providers, object-safe for `Arc<dyn LlmProvider>`.
///
/// ```rust,ignore
/// let request = CompletionRequest::new()
///     .with_system(CRITIQUE_SYSTEM_PROMPT)
///     .with_message(Message::user(prompt).with_image(image_url));
/// let response = provider.complete(request).await?;
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn info(&self) -> ProviderInfo;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Default: a one-token completion
    async fn health_check(&self) -> Result<(), LlmError> {
        let request = CompletionRequest::new().with_user("ping").with_max_tokens(1);
        self.complete(request).await.map(|_| ())
    }

    fn default_model(&self) -> &str;
}
