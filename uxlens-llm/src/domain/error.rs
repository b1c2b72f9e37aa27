//! LLM-specific error types
//!
//! `LlmError` covers talking to a provider. `CritiqueParseError` covers what comes back:
//! the critique text is untrusted and every way it can be unusable is named here, with the
//! raw output kept for diagnostics.

use std::time::Duration;

use thiserror::Error;

/// LLM operation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Invalid API key, expired token, etc.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {message}{}", .retry_after.map(|s| format!(" (retry after {}s)", s)).unwrap_or_default())]
    RateLimited {
        /// Seconds to wait before retrying (if provided)
        retry_after: Option<u64>,
        message: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Blocked by the provider's safety systems
    #[error("Content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Provider returned something that is not a completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Circuit breaker open for: {circuit}")]
    CircuitOpen { circuit: String },

    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::Network(_)
                | LlmError::Timeout { .. }
                | LlmError::ServiceUnavailable(_)
        )
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Get retry-after duration if available
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after, .. } => retry_after.map(Duration::from_secs),
            _ => None,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn rate_limited_with_retry(message: impl Into<String>, seconds: u64) -> Self {
        Self::RateLimited {
            retry_after: Some(seconds),
            message: message.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout { seconds: 0 }
        } else if err.is_connect() {
            LlmError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(format!("JSON parse error: {}", err))
    }
}

/// Raw model output kept on a parse error
const RAW_DETAIL_LIMIT: usize = 2000;

/// Why a critique response could not be used. The frame is marked skipped with this
/// error as its detail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CritiqueParseError {
    #[error("Critique response is not valid JSON: {message}")]
    InvalidJson { message: String, raw: String },

    #[error("Critique response is JSON but not an object")]
    NotAnObject { raw: String },

    #[error("Critique response is missing required keys: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String>, raw: String },

    #[error("Critique field '{field}' has an unusable value: {message}")]
    InvalidField {
        field: String,
        message: String,
        raw: String,
    },
}

impl CritiqueParseError {
    /// Model output that caused the error, truncated
    pub fn raw(&self) -> &str {
        match self {
            Self::InvalidJson { raw, .. }
            | Self::NotAnObject { raw }
            | Self::MissingKeys { raw, .. }
            | Self::InvalidField { raw, .. } => raw,
        }
    }

    /// Message plus raw output, as stored on a skipped frame
    pub fn detail(&self) -> String {
        format!("{}; raw: {}", self, self.raw())
    }
}

/// Failure of one frame's critique
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CritiqueError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] CritiqueParseError),

    #[error("Critique did not finish within {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("Critique response was empty")]
    EmptyResponse,
}

impl CritiqueError {
    /// Text stored as the skipped frame's error detail
    pub fn detail(&self) -> String {
        match self {
            Self::Parse(err) => err.detail(),
            other => other.to_string(),
        }
    }
}

/// Truncate model output on a char boundary
pub fn truncate_raw(raw: &str) -> String {
    if raw.len() <= RAW_DETAIL_LIMIT {
        return raw.to_string();
    }
    let mut end = RAW_DETAIL_LIMIT;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}
