//! Normalized frames and their accessibility results

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::geometry::{BoundingBox, Color};

/// A top-level screen extracted from a design document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub name: String,
    pub bounds: Option<BoundingBox>,
    /// Resolved background, opaque white when the source has none
    pub background: Color,
    /// Paint order, as in the source
    pub children: Vec<FrameChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum FrameChild {
    Text(TextNode),
    Other(OtherNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: String,
    pub name: String,
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    /// Resolved foreground, opaque black when the source has none
    pub color: Color,
    pub bounds: Option<BoundingBox>,
    contrast: Option<ContrastScore>,
}

/// A non-text node kept for background resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherNode {
    pub id: String,
    pub name: String,
    pub node_type: String,
    pub bounds: Option<BoundingBox>,
    pub fill: Option<Color>,
}

/// WCAG compliance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ComplianceLevel {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AA-Large")]
    AaLarge,
    #[serde(rename = "Low-Contrast")]
    LowContrast,
    #[serde(rename = "Fail")]
    Fail,
}

impl ComplianceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::AaLarge => "AA-Large",
            Self::LowContrast => "Low-Contrast",
            Self::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContrastScore {
    /// Rounded to two decimals
    pub ratio: f64,
    pub score: u8,
    pub level: ComplianceLevel,
    pub large_text: bool,
    pub background: Color,
}

impl TextNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        font_size: f64,
        bold: bool,
        color: Color,
        bounds: Option<BoundingBox>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
            font_size,
            bold,
            color,
            bounds,
            contrast: None,
        }
    }

    pub fn contrast(&self) -> Option<&ContrastScore> {
        self.contrast.as_ref()
    }

    /// Record the contrast result once. Returns `false` and leaves the node untouched
    /// if it was already scored.
    pub fn record_contrast(&mut self, score: ContrastScore) -> bool {
        if self.contrast.is_some() {
            return false;
        }
        self.contrast = Some(score);
        true
    }
}

impl Frame {
    pub fn text_nodes(&self) -> impl Iterator<Item = &TextNode> {
        self.children.iter().filter_map(|c| match c {
            FrameChild::Text(t) => Some(t),
            FrameChild::Other(_) => None,
        })
    }

    pub fn text_nodes_mut(&mut self) -> impl Iterator<Item = &mut TextNode> {
        self.children.iter_mut().filter_map(|c| match c {
            FrameChild::Text(t) => Some(t),
            FrameChild::Other(_) => None,
        })
    }
}

/// Per-text row of a frame's accessibility report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextAccessibility {
    pub node_id: String,
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
    pub score: u8,
    pub level: ComplianceLevel,
    pub large_text: bool,
}

/// Deterministic accessibility metrics for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FrameAccessibility {
    /// Rounded mean of text scores, 0 when the frame has no text
    pub average_score: u8,
    pub texts: Vec<TextAccessibility>,
}
