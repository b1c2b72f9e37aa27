//! uxlens - Main application library
//!
//! This is the main binary crate that wires together all modules

mod app;

pub use app::{AppHandle, create_app};
pub use uxlens_core::{Config, init_tracing};
pub use uxlens_orchestrator::presentation::controllers::OrchestratorState;

// Re-export for convenience
pub use uxlens_analysis;
pub use uxlens_core;
pub use uxlens_llm;
pub use uxlens_orchestrator;
