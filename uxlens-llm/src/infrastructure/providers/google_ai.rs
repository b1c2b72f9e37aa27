//! Google AI Studio (Gemini) provider implementation
//!
//! System messages become `systemInstruction`. Image blocks become `fileData` parts for
//! remote URLs and `inlineData` parts for base64 `data:` URIs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, Role, StopReason, Usage,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GoogleAIProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: build_client(120),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Custom base URL (for testing or proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = build_client(timeout_secs);
        self
    }

    fn build_url(&self, model: &str, endpoint: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.base_url, model, endpoint, self.api_key
        )
    }

    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .filter(|msg| msg.role != Role::System)
            .map(|msg| GeminiContent {
                role: match msg.role {
                    Role::Assistant => "model".to_string(),
                    _ => "user".to_string(),
                },
                parts: msg.content.iter().map(to_gemini_part).collect(),
            })
            .collect();

        let system_instruction = request.system_text().map(|text| GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart::Text { text }],
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request
                    .json_mode
                    .then(|| "application/json".to_string()),
            }),
        }
    }

    fn from_gemini_response(
        &self,
        response: GeminiResponse,
        model: &str,
    ) -> Result<CompletionResponse, LlmError> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
        {
            return Err(LlmError::ContentFiltered { reason });
        }

        let candidate =
            response.candidates.into_iter().next().ok_or_else(|| {
                LlmError::InvalidResponse("No candidates in response".to_string())
            })?;

        let content = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match part {
                GeminiPart::Text { text } => Some(ContentBlock::Text { text }),
                _ => None,
            })
            .collect();

        let stop_reason = match candidate.finish_reason.as_deref() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                StopReason::ContentFilter
            }
            _ => StopReason::Other,
        };

        let usage = response
            .usage_metadata
            .map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: format!("gemini-{}", uuid::Uuid::new_v4()),
            model: model.to_string(),
            content,
            stop_reason,
            usage,
            created: Some(chrono::Utc::now().timestamp() as u64),
        })
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to build HTTP client with custom timeout, using default client");
            Client::new()
        })
}

fn to_gemini_part(block: &ContentBlock) -> GeminiPart {
    match block {
        ContentBlock::Text { text } => GeminiPart::Text { text: text.clone() },
        ContentBlock::Image { url, mime_type, .. } => {
            if let Some((mime, data)) = split_data_uri(url) {
                GeminiPart::InlineData {
                    inline_data: GeminiInlineData {
                        mime_type: mime,
                        data,
                    },
                }
            } else {
                GeminiPart::FileData {
                    file_data: GeminiFileData {
                        mime_type: mime_type.clone().unwrap_or_else(|| guess_mime_type(url)),
                        file_uri: url.clone(),
                    },
                }
            }
        }
    }
}

/// `data:image/png;base64,AAAA` → ("image/png", "AAAA")
fn split_data_uri(url: &str) -> Option<(String, String)> {
    let rest = url.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime.to_string(), data.to_string()))
}

fn guess_mime_type(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "image/png"
    }
    .to_string()
}

#[async_trait]
impl LlmProvider for GoogleAIProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "google_ai",
            name: "Google AI Studio",
            version: "v1beta",
            capabilities: ProviderCapabilities::multimodal(1_000_000, 8192),
        }
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let url = self.build_url(model, "generateContent");
        let gemini_request = self.to_gemini_request(&request);

        debug!(model = model, "Sending request to Google AI");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => LlmError::rate_limited(text),
                401 | 403 => LlmError::auth(text),
                404 => LlmError::ModelNotFound(model.to_string()),
                s if s >= 500 => LlmError::ServiceUnavailable(text),
                _ => {
                    error!(status = %status, "Google AI API error: {}", text);
                    LlmError::InvalidRequest(format!("API error {}: {}", status, text))
                }
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        self.from_gemini_response(gemini_response, model)
    }
}

// === Gemini API Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: GeminiFileData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiFileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;

    #[test]
    fn test_build_url() {
        let provider = GoogleAIProvider::new("test-key", "gemini-flash-latest");
        let url = provider.build_url("gemini-flash-latest", "generateContent");

        assert!(url.contains("/models/gemini-flash-latest:generateContent"));
        assert!(url.contains("key=test-key"));
    }

    #[test]
    fn test_system_message_becomes_instruction() {
        let provider = GoogleAIProvider::new("test-key", "gemini-flash-latest");
        let request = CompletionRequest::new()
            .with_system("You are a UX evaluator.")
            .with_message(Message::user("Frame").with_image("https://img.example.com/a.JPG?v=2"))
            .with_json_mode(true);

        let body = serde_json::to_value(provider.to_gemini_request(&request)).unwrap();
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a UX evaluator."
        );
        assert_eq!(body["contents"][0]["parts"][1]["fileData"]["mimeType"], "image/jpeg");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_data_uri_becomes_inline_data() {
        let part = to_gemini_part(&ContentBlock::image("data:image/png;base64,iVBORw0"));
        let body = serde_json::to_value(part).unwrap();
        assert_eq!(body["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["inlineData"]["data"], "iVBORw0");
    }
}
