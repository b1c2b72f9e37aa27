//! Resilient LLM provider wrapper
//!
//! Circuit breaker plus optional retry around any provider. Critique runs use
//! `max_retries = 0`: a failed call skips the frame instead of being repeated.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use uxlens_core::config::LlmResilienceConfig;

use crate::domain::{CompletionRequest, CompletionResponse, LlmError, LlmProvider, ProviderInfo};

#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Retries for transient errors
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Consecutive failures before the circuit opens
    pub circuit_breaker_threshold: u32,
    /// Seconds before an open circuit lets a probe through
    pub circuit_breaker_timeout_secs: u64,
    pub half_open_max_requests: u32,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            circuit_breaker_threshold: 5,
            circuit_breaker_timeout_secs: 60,
            half_open_max_requests: 1,
        }
    }
}

impl From<&LlmResilienceConfig> for ResilienceConfig {
    fn from(config: &LlmResilienceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
            circuit_breaker_threshold: config.circuit_breaker_threshold.max(1),
            circuit_breaker_timeout_secs: config.circuit_breaker_timeout_secs,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

struct CircuitBreakerState {
    state: CircuitState,
    failure_count: u32,
    last_failure_time: Option<Instant>,
    half_open_requests: u32,
}

/// Wraps a provider with a circuit breaker and retry with exponential backoff
pub struct ResilientProvider {
    inner: Arc<dyn LlmProvider>,
    config: ResilienceConfig,
    circuit_state: Mutex<CircuitBreakerState>,
}

impl ResilientProvider {
    pub fn new(provider: Arc<dyn LlmProvider>, config: ResilienceConfig) -> Self {
        Self {
            inner: provider,
            config,
            circuit_state: Mutex::new(CircuitBreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure_time: None,
                half_open_requests: 0,
            }),
        }
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, ResilienceConfig::default())
    }

    fn circuit_open(&self) -> LlmError {
        LlmError::CircuitOpen {
            circuit: self.inner.info().id.to_string(),
        }
    }

    async fn can_execute(&self) -> Result<(), LlmError> {
        let mut state = self.circuit_state.lock().await;

        match state.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let cooled_down = state.last_failure_time.is_some_and(|t| {
                    t.elapsed() >= Duration::from_secs(self.config.circuit_breaker_timeout_secs)
                });
                if cooled_down {
                    debug!("Circuit breaker transitioning to half-open");
                    state.state = CircuitState::HalfOpen;
                    state.half_open_requests = 1;
                    Ok(())
                } else {
                    Err(self.circuit_open())
                }
            }
            CircuitState::HalfOpen => {
                if state.half_open_requests < self.config.half_open_max_requests {
                    state.half_open_requests += 1;
                    Ok(())
                } else {
                    Err(self.circuit_open())
                }
            }
        }
    }

    async fn on_success(&self) {
        let mut state = self.circuit_state.lock().await;
        if state.state == CircuitState::HalfOpen {
            debug!("Circuit breaker closing after successful request in half-open state");
        }
        state.state = CircuitState::Closed;
        state.failure_count = 0;
        state.half_open_requests = 0;
    }

    async fn on_failure(&self) {
        let mut state = self.circuit_state.lock().await;

        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());

        match state.state {
            CircuitState::Closed => {
                if state.failure_count >= self.config.circuit_breaker_threshold {
                    warn!(
                        provider = self.inner.info().id,
                        failures = state.failure_count,
                        threshold = self.config.circuit_breaker_threshold,
                        "Circuit breaker opening due to failures"
                    );
                    state.state = CircuitState::Open;
                }
            }
            CircuitState::HalfOpen => {
                debug!("Circuit breaker reopening after failure in half-open state");
                state.state = CircuitState::Open;
                state.half_open_requests = 0;
            }
            CircuitState::Open => {}
        }
    }

    async fn execute_with_retry(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let mut backoff = self.config.initial_backoff_ms;
        let mut attempt = 0;

        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() || attempt >= self.config.max_retries => {
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;
                    // Honor retry-after if provided
                    if let Some(retry_after) = e.retry_after()
                        && retry_after.as_millis() < self.config.max_backoff_ms as u128
                    {
                        backoff = retry_after.as_millis() as u64;
                    }
                    debug!(attempt, backoff_ms = backoff, error = %e, "Retrying LLM request");
                    sleep(Duration::from_millis(backoff)).await;
                    backoff = (backoff * 2 + jitter(backoff / 4)).min(self.config.max_backoff_ms);
                }
            }
        }
    }
}

fn jitter(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::rng().random_range(0..max)
}

#[async_trait]
impl LlmProvider for ResilientProvider {
    fn info(&self) -> ProviderInfo {
        self.inner.info()
    }

    fn default_model(&self) -> &str {
        self.inner.default_model()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.can_execute().await?;

        match self.execute_with_retry(request).await {
            Ok(response) => {
                self.on_success().await;
                Ok(response)
            }
            Err(e) => {
                self.on_failure().await;
                Err(e)
            }
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        self.inner.health_check().await
    }
}
