//! LLM domain layer
//!
//! - Provider-agnostic request/response messages (text and image content)
//! - The `LlmProvider` trait
//! - The per-frame critique request
//! - Provider and critique-parsing errors

pub mod critique;
pub mod error;
pub mod messages;
pub mod provider;

pub use critique::*;
pub use error::*;
pub use messages::*;
pub use provider::*;
