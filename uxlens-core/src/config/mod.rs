//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub design_source: DesignSourceConfig,
    pub evaluation: EvaluationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI).
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer.
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any (development only).
    pub allowed_origins: Vec<String>,
    /// Grace period for in-flight evaluation runs after a shutdown signal.
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_docs: true,
            request_timeout_seconds: 30,
            allowed_origins: vec!["*".to_string()],
            shutdown_timeout_seconds: 5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL (can also be set via DATABASE_URL env var).
    /// When absent the ledger is kept in memory.
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_seconds: 30,
        }
    }
}

/// Critique model configuration with multi-provider support
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Active provider: "google_ai", "openai", "azure"
    pub provider: String,

    /// Google AI (Gemini) configuration
    #[serde(default)]
    pub google_ai: GoogleAIConfig,

    /// OpenAI configuration
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Azure OpenAI configuration
    #[serde(default)]
    pub azure: AzureOpenAIConfig,

    /// Default model to use (provider-specific)
    pub default_model: String,
    /// Temperature for generation (0.0 to 1.0)
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Per-call timeout in seconds. A frame whose critique exceeds it is skipped.
    pub timeout_seconds: u64,

    #[serde(default)]
    pub resilience: LlmResilienceConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "google_ai".to_string(),
            google_ai: GoogleAIConfig::default(),
            openai: OpenAIConfig::default(),
            azure: AzureOpenAIConfig::default(),
            default_model: "gemini-flash-latest".to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            timeout_seconds: 90,
            resilience: LlmResilienceConfig::default(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Google AI (Gemini) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleAIConfig {
    /// API Key (can also use GOOGLE_AI_KEY env var)
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
}

impl Default for GoogleAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// API Key (can also use OPENAI_API_KEY env var)
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Organization ID (optional)
    pub organization_id: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            organization_id: None,
        }
    }
}

/// Azure OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureOpenAIConfig {
    /// Azure resource endpoint
    pub endpoint: String,
    /// API Key (can also use AZURE_OPENAI_KEY env var)
    pub api_key: Option<String>,
    /// Deployment name
    pub deployment: String,
    /// API version
    pub api_version: String,
}

impl Default for AzureOpenAIConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            deployment: String::new(),
            api_version: "2024-02-15-preview".to_string(),
        }
    }
}

/// Circuit breaker around the critique provider.
///
/// `max_retries` stays at 0 for evaluation runs: a failed critique marks the frame
/// skipped and a new run is the caller's decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmResilienceConfig {
    pub enabled: bool,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Number of failures before circuit opens
    pub circuit_breaker_threshold: u32,
    /// Seconds before circuit attempts recovery
    pub circuit_breaker_timeout_secs: u64,
}

impl Default for LlmResilienceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 0,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            circuit_breaker_threshold: 5,
            circuit_breaker_timeout_secs: 60,
        }
    }
}

/// Design-document API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSourceConfig {
    pub base_url: String,
    /// Personal access token (can also use FIGMA_TOKEN env var)
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    /// Render scale requested for frame images
    pub image_scale: f64,
    /// "png" or "jpg"
    pub image_format: String,
    /// Image used when a render cannot be obtained
    pub placeholder_image_url: String,
}

impl Default for DesignSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.figma.com/v1".to_string(),
            access_token: None,
            timeout_seconds: 30,
            image_scale: 1.0,
            image_format: "png".to_string(),
            placeholder_image_url: "https://placehold.co/1280x800/png?text=Preview+unavailable"
                .to_string(),
        }
    }
}

/// Evaluation pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Frames with a bounding box smaller than this in either dimension are ignored
    pub min_frame_dimension: f64,
    /// Keywords a frame is classified against for theme relevance
    pub theme_keywords: BTreeSet<String>,
    /// Depth limit of the normalized tree, counted from the document root
    pub max_tree_depth: usize,
    /// Depth limit for a single button-detection worker, counted from its frame
    pub max_detection_depth: usize,
    /// Upper bound on frames critiqued in one run
    pub max_frames_per_run: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            min_frame_dimension: 100.0,
            theme_keywords: ["login", "signup", "checkout", "dashboard", "onboarding", "profile"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_tree_depth: 256,
            max_detection_depth: 64,
            max_frames_per_run: 50,
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.llm.validate()?;
        self.design_source.validate()?;
        self.evaluation.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Local file and environment variables have the highest priority
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("UXLENS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("evaluation.theme_keywords")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let mut config: Config = builder.build()?.try_deserialize()?;

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            config.database.url = Some(database_url);
        }
        if config.design_source.access_token.is_none() {
            config.design_source.access_token = std::env::var("FIGMA_TOKEN").ok();
        }

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
