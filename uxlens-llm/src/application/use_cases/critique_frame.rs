//! Use case for critiquing one rendered frame

use std::sync::Arc;

use tracing::{debug, info, warn};
use uxlens_core::config::LlmConfig;
use uxlens_core::domain::CritiqueResult;

use crate::domain::{CompletionRequest, CritiqueError, CritiqueRequest, LlmProvider, Message};
use crate::infrastructure::critique_normalizer::CritiqueNormalizer;
use crate::infrastructure::prompts::PromptBuilder;

/// Sends a frame's image and measurements to the critique model and validates the answer.
///
/// Each call is bounded by `llm.timeout_seconds`. Errors are returned, never retried here:
/// the caller decides whether the frame is skipped.
pub struct CritiqueFrameUseCase {
    provider: Arc<dyn LlmProvider>,
    config: LlmConfig,
}

impl CritiqueFrameUseCase {
    pub fn new(provider: Arc<dyn LlmProvider>, config: LlmConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub async fn execute(&self, request: &CritiqueRequest) -> Result<CritiqueResult, CritiqueError> {
        let completion = self.build_request(request);

        debug!(
            frame_index = request.frame_index,
            frame = %request.frame_name,
            provider = self.provider.info().id,
            "Requesting frame critique"
        );

        let response = tokio::time::timeout(self.config.timeout(), self.provider.complete(completion))
            .await
            .map_err(|_| CritiqueError::TimedOut {
                seconds: self.config.timeout_seconds,
            })??;

        if response.is_truncated() {
            warn!(
                frame_index = request.frame_index,
                "Critique response hit the token limit"
            );
        }

        let text = response.text();
        if text.trim().is_empty() {
            return Err(CritiqueError::EmptyResponse);
        }

        let critique = CritiqueNormalizer::parse(&text, request.frame_index)?;

        info!(
            frame_index = request.frame_index,
            overall_score = critique.overall_score,
            issues = critique.issues.len(),
            "Frame critique complete"
        );

        Ok(critique)
    }

    /// Image goes in as a content block for vision providers and as a link otherwise
    fn build_request(&self, request: &CritiqueRequest) -> CompletionRequest {
        let mut prompt = PromptBuilder::build_frame_prompt(request);
        let vision = self.provider.info().capabilities.vision;

        let user = if vision {
            Message::user(prompt).with_image(&request.image_url)
        } else {
            prompt.push_str(&format!("\n## Rendered image\n{}\n", request.image_url));
            Message::user(prompt)
        };

        CompletionRequest::new()
            .with_model(&self.config.default_model)
            .with_system(PromptBuilder::build_system_prompt())
            .with_message(user)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature)
            .with_json_mode(true)
    }
}
