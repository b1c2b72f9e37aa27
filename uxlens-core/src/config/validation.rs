//! Configuration validation module

use crate::config::{
    DatabaseConfig, DesignSourceConfig, EvaluationConfig, LlmConfig, ServerConfig,
};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Database configuration error: {message}")]
    Database { message: String },

    #[error("LLM configuration error: {message}")]
    Llm { message: String },

    #[error("Design source configuration error: {message}")]
    DesignSource { message: String },

    #[error("Evaluation configuration error: {message}")]
    Evaluation { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    pub fn design_source(message: impl Into<String>) -> Self {
        Self::DesignSource {
            message: message.into(),
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so only 0 is out of range
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.url
            && !url.starts_with("postgres://")
            && !url.starts_with("postgresql://")
        {
            return Err(ValidationError::database(
                "Database URL must start with postgres:// or postgresql://",
            ));
        }

        if self.max_connections == 0 {
            return Err(ValidationError::database(
                "max_connections must be greater than 0",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ValidationError::database(
                "connect_timeout_seconds must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for LlmConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ValidationError::llm("LLM timeout must be > 0"));
        }

        if self.default_model.trim().is_empty() {
            return Err(ValidationError::llm("default_model cannot be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::llm(format!(
                "temperature must be within 0.0-2.0, got {}",
                self.temperature
            )));
        }

        match self.provider.to_lowercase().as_str() {
            "google_ai" | "gemini" => {
                if !is_http_url(&self.google_ai.base_url) {
                    return Err(ValidationError::llm(format!(
                        "google_ai.base_url must start with http:// or https://, got: {}",
                        self.google_ai.base_url
                    )));
                }
            }
            "openai" => {
                if !is_http_url(&self.openai.base_url) {
                    return Err(ValidationError::llm(format!(
                        "openai.base_url must start with http:// or https://, got: {}",
                        self.openai.base_url
                    )));
                }
            }
            "azure" | "azure_openai" => {
                if self.azure.endpoint.is_empty() || self.azure.deployment.is_empty() {
                    return Err(ValidationError::llm(
                        "azure provider requires endpoint and deployment",
                    ));
                }
            }
            other => {
                return Err(ValidationError::llm(format!("Unknown provider: {}", other)));
            }
        }

        Ok(())
    }
}

impl Validate for DesignSourceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::design_source(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ValidationError::design_source(
                "timeout_seconds must be greater than 0",
            ));
        }

        if !(0.01..=4.0).contains(&self.image_scale) {
            return Err(ValidationError::design_source(format!(
                "image_scale must be within 0.01-4.0, got {}",
                self.image_scale
            )));
        }

        if !matches!(self.image_format.as_str(), "png" | "jpg") {
            return Err(ValidationError::design_source(format!(
                "image_format must be png or jpg, got {}",
                self.image_format
            )));
        }

        Ok(())
    }
}

impl Validate for EvaluationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.min_frame_dimension <= 0.0 {
            return Err(ValidationError::evaluation(
                "min_frame_dimension must be greater than 0",
            ));
        }

        if self.max_tree_depth == 0 {
            return Err(ValidationError::evaluation(
                "max_tree_depth must be greater than 0",
            ));
        }

        if self.max_detection_depth == 0 {
            return Err(ValidationError::evaluation(
                "max_detection_depth must be greater than 0",
            ));
        }

        if self.max_frames_per_run == 0 {
            return Err(ValidationError::evaluation(
                "max_frames_per_run must be greater than 0",
            ));
        }

        if self.theme_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ValidationError::evaluation(
                "theme_keywords cannot contain blank entries",
            ));
        }

        Ok(())
    }
}
