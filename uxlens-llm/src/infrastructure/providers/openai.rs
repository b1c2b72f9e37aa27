//! OpenAI-compatible provider implementation
//!
//! Works with OpenAI, Azure OpenAI, and any OpenAI-compatible chat completions API.
//! Image blocks are sent as `image_url` content parts.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, StopReason, Usage,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    organization_id: Option<String>,
    /// For Azure: deployment name (overrides model in URL)
    azure_deployment: Option<String>,
    azure_api_version: Option<String>,
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

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: build_client(120),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            organization_id: None,
            azure_deployment: None,
            azure_api_version: None,
        }
    }

    /// Create for Azure OpenAI
    pub fn azure(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let deployment = deployment.into();
        let api_version = api_version.into();

        Self {
            client: build_client(120),
            api_key: api_key.into(),
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            model: deployment.clone(),
            organization_id: None,
            azure_deployment: Some(deployment),
            azure_api_version: Some(if api_version.is_empty() {
                DEFAULT_AZURE_API_VERSION.to_string()
            } else {
                api_version
            }),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_organization(mut self, org_id: impl Into<String>) -> Self {
        self.organization_id = Some(org_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = build_client(timeout_secs);
        self
    }

    fn chat_url(&self) -> String {
        if let Some(ref deployment) = self.azure_deployment {
            let api_version = self
                .azure_api_version
                .as_deref()
                .unwrap_or(DEFAULT_AZURE_API_VERSION);
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url, deployment, api_version
            )
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }

    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| {
                // Plain string content unless the message carries an image
                let content = if msg.has_image() {
                    OpenAIContent::Parts(
                        msg.content
                            .iter()
                            .map(|block| match block {
                                ContentBlock::Text { text } => {
                                    OpenAIContentPart::Text { text: text.clone() }
                                }
                                ContentBlock::Image { url, detail, .. } => {
                                    OpenAIContentPart::ImageUrl {
                                        image_url: OpenAIImageUrl {
                                            url: url.clone(),
                                            detail: detail.clone(),
                                        },
                                    }
                                }
                            })
                            .collect(),
                    )
                } else {
                    OpenAIContent::Text(msg.text())
                };

                OpenAIMessage {
                    role: msg.role.as_str().to_string(),
                    content,
                }
            })
            .collect();

        OpenAIRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_mode.then(|| OpenAIResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    fn parse_openai_response(&self, response: OpenAIResponse) -> CompletionResponse {
        let choice = response.choices.into_iter().next();

        let content = choice
            .as_ref()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .map(|text| vec![ContentBlock::Text { text }])
            .unwrap_or_default();

        let stop_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(|r| match r {
                "stop" => StopReason::EndTurn,
                "length" => StopReason::MaxTokens,
                "content_filter" => StopReason::ContentFilter,
                _ => StopReason::Other,
            })
            .unwrap_or(StopReason::Other);

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            id: response.id,
            model: response.model,
            content,
            stop_reason,
            usage,
            created: response.created,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn info(&self) -> ProviderInfo {
        let is_azure = self.azure_deployment.is_some();
        ProviderInfo {
            id: if is_azure { "azure" } else { "openai" },
            name: if is_azure { "Azure OpenAI" } else { "OpenAI" },
            version: "v1",
            capabilities: ProviderCapabilities::multimodal(128_000, 16_384),
        }
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = self.chat_url();
        let openai_request = self.to_openai_request(&request);

        debug!(model = %openai_request.model, "Sending request to OpenAI-compatible API");

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if self.azure_deployment.is_some() {
            req = req.header("api-key", &self.api_key);
        } else {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
            if let Some(ref org) = self.organization_id {
                req = req.header("OpenAI-Organization", org);
            }
        }

        let response = req.json(&openai_request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => match retry_after {
                    Some(secs) => LlmError::rate_limited_with_retry(text, secs),
                    None => LlmError::rate_limited(text),
                },
                401 | 403 => LlmError::auth(text),
                404 => LlmError::ModelNotFound(openai_request.model),
                s if s >= 500 => LlmError::ServiceUnavailable(text),
                _ => {
                    error!(status = %status, "OpenAI API error: {}", text);
                    LlmError::InvalidRequest(format!("API error {}: {}", status, text))
                }
            });
        }

        let openai_response: OpenAIResponse = response.json().await?;
        Ok(self.parse_openai_response(openai_response))
    }
}

// === OpenAI API Types ===

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: OpenAIContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAIContent {
    Text(String),
    Parts(Vec<OpenAIContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OpenAIContentPart {
    Text { text: String },
    ImageUrl { image_url: OpenAIImageUrl },
}

#[derive(Debug, Serialize)]
struct OpenAIImageUrl {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    created: Option<u64>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
