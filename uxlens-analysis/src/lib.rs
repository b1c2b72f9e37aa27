//! uxlens Analysis - deterministic design document analysis
//!
//! Turns a raw design-tool document into typed frames and computes everything that does
//! not need a model:
//!
//! - Normalization of the raw node tree into [`uxlens_core::domain::DesignNode`] and frames
//! - WCAG contrast ratio and compliance level for every text node
//! - Button detection (one worker per frame) and accordion detection (whole tree)
//! - Theme keyword classification per frame
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uxlens_analysis::{AnalysisSettings, AnalyzeDocumentUseCase};
//!
//! let use_case = AnalyzeDocumentUseCase::new(AnalysisSettings::from_config(&config.evaluation));
//! let analysis = use_case.execute(&raw_document).await?;
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::{AnalyzeDocumentUseCase, DocumentAnalysis, FrameAnalysis};
pub use domain::*;
pub use infrastructure::detector::{ButtonDetection, ElementDetector, FrameButtons};
pub use infrastructure::normalizer::{DocumentNormalizer, NormalizedDocument};
pub use infrastructure::scorer::ContrastScorer;
