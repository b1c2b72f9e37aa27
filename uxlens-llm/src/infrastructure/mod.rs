pub mod critique_normalizer;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod response_parser;

pub use critique_normalizer::CritiqueNormalizer;
pub use registry::{ProviderRegistry, ProviderType};
pub use response_parser::ResponseParser;
