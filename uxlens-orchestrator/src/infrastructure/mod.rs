//! Orchestrator infrastructure layer

pub mod design_source;
pub mod job_store;

pub use design_source::FigmaDesignSource;
pub use job_store::*;
