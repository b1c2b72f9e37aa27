//! Critique-model providers

pub mod google_ai;
pub mod openai;
pub mod resilient;

pub use google_ai::GoogleAIProvider;
pub use openai::OpenAIProvider;
pub use resilient::{ResilienceConfig, ResilientProvider};
