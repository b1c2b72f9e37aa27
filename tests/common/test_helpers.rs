//! Common test helper functions and utilities

use axum_test::TestServer;
use uxlens::{Config, create_app};

/// Test configuration builder for creating consistent test configurations
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    /// Defaults with an in-memory ledger and a dummy critique key
    pub fn new() -> Self {
        let mut config = Config::default();
        config.database.url = None;
        config.llm.provider = "google_ai".to_string();
        config.llm.google_ai.api_key = Some("test-api-key".to_string());
        Self { config }
    }

    pub fn without_docs(mut self) -> Self {
        self.config.server.enable_docs = false;
        self
    }

    pub fn without_llm_keys(mut self) -> Self {
        self.config.llm.google_ai.api_key = None;
        self.config.llm.openai.api_key = None;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for creating test servers with consistent configuration
pub struct TestServerBuilder;

impl TestServerBuilder {
    /// Create a test server with default configuration
    pub async fn new() -> Result<TestServer, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_config(TestConfigBuilder::new().build()).await
    }

    /// Create a test server with custom configuration
    pub async fn with_config(
        config: Config,
    ) -> Result<TestServer, Box<dyn std::error::Error + Send + Sync>> {
        let app = create_app(config).await?;
        Ok(TestServer::new(app.router)?)
    }
}
