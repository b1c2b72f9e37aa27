//! Provider registry
//!
//! Builds the configured critique provider and keeps named instances.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uxlens_core::config::LlmConfig;

use crate::domain::{LlmError, LlmProvider};
use crate::infrastructure::providers::{
    GoogleAIProvider, OpenAIProvider, ResilienceConfig, ResilientProvider,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderType {
    GoogleAI,
    OpenAI,
    Azure,
    Custom(String),
}

impl ProviderType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "google_ai" | "gemini" | "google" => Self::GoogleAI,
            "openai" | "gpt" => Self::OpenAI,
            "azure" | "azure_openai" => Self::Azure,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::GoogleAI => "google_ai",
            Self::OpenAI => "openai",
            Self::Azure => "azure",
            Self::Custom(s) => s,
        }
    }
}

/// ```rust,ignore
/// let registry = ProviderRegistry::from_llm_config(&config.llm)?;
/// let provider = registry.default_provider().unwrap();
/// ```
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    default_name: Option<String>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            default_name: None,
        }
    }

    /// The first registered provider becomes the default
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        let name = name.into();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.providers.insert(name, provider);
    }

    pub fn default_provider(&self) -> Option<Arc<dyn LlmProvider>> {
        self.default_name
            .as_ref()
            .and_then(|name| self.providers.get(name).cloned())
    }

    /// Registry holding the provider selected by `llm.provider` under "default",
    /// wrapped in the circuit breaker when resilience is enabled.
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider_type = ProviderType::parse(&config.provider);
        let timeout = config.timeout_seconds;

        let provider: Arc<dyn LlmProvider> = match &provider_type {
            ProviderType::GoogleAI => {
                let api_key = config
                    .google_ai
                    .api_key
                    .clone()
                    .or_else(|| std::env::var("GOOGLE_AI_KEY").ok())
                    .ok_or_else(|| {
                        LlmError::Configuration(
                            "Google AI API key not configured. Set llm.google_ai.api_key or GOOGLE_AI_KEY env var".to_string(),
                        )
                    })?;

                let mut provider =
                    GoogleAIProvider::new(&api_key, &config.default_model).with_timeout(timeout);
                if !config.google_ai.base_url.is_empty() {
                    provider = provider.with_base_url(&config.google_ai.base_url);
                }
                Arc::new(provider)
            }
            ProviderType::OpenAI => {
                let api_key = config
                    .openai
                    .api_key
                    .clone()
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .ok_or_else(|| {
                        LlmError::Configuration(
                            "OpenAI API key not configured. Set llm.openai.api_key or OPENAI_API_KEY env var".to_string(),
                        )
                    })?;

                let mut provider =
                    OpenAIProvider::new(&api_key, &config.default_model).with_timeout(timeout);
                if !config.openai.base_url.is_empty() {
                    provider = provider.with_base_url(&config.openai.base_url);
                }
                if let Some(ref org) = config.openai.organization_id {
                    provider = provider.with_organization(org);
                }
                Arc::new(provider)
            }
            ProviderType::Azure => {
                let api_key = config
                    .azure
                    .api_key
                    .clone()
                    .or_else(|| std::env::var("AZURE_OPENAI_KEY").ok())
                    .ok_or_else(|| {
                        LlmError::Configuration(
                            "Azure OpenAI API key not configured. Set llm.azure.api_key or AZURE_OPENAI_KEY env var".to_string(),
                        )
                    })?;

                if config.azure.endpoint.is_empty() {
                    return Err(LlmError::Configuration(
                        "Azure endpoint not configured".to_string(),
                    ));
                }
                if config.azure.deployment.is_empty() {
                    return Err(LlmError::Configuration(
                        "Azure deployment not configured".to_string(),
                    ));
                }

                Arc::new(
                    OpenAIProvider::azure(
                        &config.azure.endpoint,
                        &api_key,
                        &config.azure.deployment,
                        &config.azure.api_version,
                    )
                    .with_timeout(timeout),
                )
            }
            ProviderType::Custom(other) => {
                return Err(LlmError::ProviderNotFound(format!(
                    "Unknown provider: {}. Valid options: google_ai, openai, azure",
                    other
                )));
            }
        };

        let provider: Arc<dyn LlmProvider> = if config.resilience.enabled {
            Arc::new(ResilientProvider::new(
                provider,
                ResilienceConfig::from(&config.resilience),
            ))
        } else {
            provider
        };

        info!(
            provider = provider_type.as_str(),
            model = provider.default_model(),
            resilient = config.resilience.enabled,
            "Critique provider configured"
        );

        let mut registry = Self::new();
        registry.register("default", provider);
        Ok(registry)
    }
}
