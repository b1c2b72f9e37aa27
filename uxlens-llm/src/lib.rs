//! Design critique through large language models
//!
//! A frame's rendered image and measurements go out to a configured provider; the
//! untrusted answer comes back as a validated [`uxlens_core::domain::CritiqueResult`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::CritiqueFrameUseCase;
pub use domain::*;
pub use infrastructure::prompts;
pub use infrastructure::providers::{GoogleAIProvider, OpenAIProvider, ResilientProvider};
pub use infrastructure::{CritiqueNormalizer, ProviderRegistry};
