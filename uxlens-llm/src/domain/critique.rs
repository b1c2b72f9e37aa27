//! Input of one critique call

use serde::{Deserialize, Serialize};
use serde_json::Value;

use uxlens_core::domain::{DetectedElement, FrameAccessibility};

/// Everything sent to the critique model for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CritiqueRequest {
    /// Position of the frame in the run; issue ids are derived from it
    pub frame_index: u32,
    pub frame_name: String,
    /// Rendered frame (or the placeholder)
    pub image_url: String,
    /// Caller-supplied context such as persona or demographic, passed through verbatim
    #[serde(default)]
    pub snapshot: Value,
    pub accessibility: FrameAccessibility,
    #[serde(default)]
    pub elements: Vec<DetectedElement>,
    #[serde(default)]
    pub theme_keywords: Vec<String>,
}
