//! Structured logging setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Error raised when the global subscriber cannot be installed
#[derive(Debug, thiserror::Error)]
pub enum LoggingInitError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level` when set. The output is JSON unless
/// `logging.format` is `pretty` (or `text`).
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    if is_json(&config.format) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
    }

    Ok(())
}

fn build_filter(directive: &str) -> Result<EnvFilter, LoggingInitError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingInitError::InvalidFilter {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}

fn is_json(format: &str) -> bool {
    !matches!(format.to_ascii_lowercase().as_str(), "pretty" | "text")
}
