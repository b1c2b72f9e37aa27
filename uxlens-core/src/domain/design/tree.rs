//! Typed design tree
//!
//! Produced by the normalizer from the design tool's raw JSON. Nothing past this boundary
//! sees loosely-typed node data: the `type` discriminator is resolved into [`NodeKind`] and
//! every optional field has a concrete default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::geometry::{BoundingBox, Color};

/// Font weight at or above which text counts as bold
pub const BOLD_FONT_WEIGHT: f64 = 700.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub bounds: Option<BoundingBox>,
    /// First visible solid fill, if any
    pub fill: Option<Color>,
    pub kind: NodeKind,
    /// Component property values keyed by property name (instances and components only)
    pub component_properties: BTreeMap<String, String>,
    /// Source sibling order is preserved
    pub children: Vec<DesignNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text(TextProps),
    Shape { shape: ShapeKind },
    /// Any type tag this model does not know, kept verbatim
    Other { tag: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub characters: String,
    pub font_size: f64,
    pub font_weight: f64,
    /// Solid text color; `None` when the source had no usable fill
    pub color: Option<Color>,
}

impl TextProps {
    pub fn is_bold(&self) -> bool {
        self.font_weight >= BOLD_FONT_WEIGHT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Vector,
    Line,
    Polygon,
    Star,
    BooleanOperation,
}

impl NodeKind {
    /// Resolve a raw type tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "DOCUMENT" => Self::Document,
            "CANVAS" => Self::Canvas,
            "FRAME" => Self::Frame,
            "GROUP" => Self::Group,
            "SECTION" => Self::Section,
            "COMPONENT" => Self::Component,
            "COMPONENT_SET" => Self::ComponentSet,
            "INSTANCE" => Self::Instance,
            "RECTANGLE" => Self::Shape {
                shape: ShapeKind::Rectangle,
            },
            "ELLIPSE" => Self::Shape {
                shape: ShapeKind::Ellipse,
            },
            "VECTOR" => Self::Shape {
                shape: ShapeKind::Vector,
            },
            "LINE" => Self::Shape {
                shape: ShapeKind::Line,
            },
            "REGULAR_POLYGON" => Self::Shape {
                shape: ShapeKind::Polygon,
            },
            "STAR" => Self::Shape {
                shape: ShapeKind::Star,
            },
            "BOOLEAN_OPERATION" => Self::Shape {
                shape: ShapeKind::BooleanOperation,
            },
            other => Self::Other {
                tag: other.to_string(),
            },
        }
    }

    /// The design tool's type tag for this kind
    pub fn tag(&self) -> &str {
        match self {
            Self::Document => "DOCUMENT",
            Self::Canvas => "CANVAS",
            Self::Frame => "FRAME",
            Self::Group => "GROUP",
            Self::Section => "SECTION",
            Self::Component => "COMPONENT",
            Self::ComponentSet => "COMPONENT_SET",
            Self::Instance => "INSTANCE",
            Self::Text(_) => "TEXT",
            Self::Shape { shape } => match shape {
                ShapeKind::Rectangle => "RECTANGLE",
                ShapeKind::Ellipse => "ELLIPSE",
                ShapeKind::Vector => "VECTOR",
                ShapeKind::Line => "LINE",
                ShapeKind::Polygon => "REGULAR_POLYGON",
                ShapeKind::Star => "STAR",
                ShapeKind::BooleanOperation => "BOOLEAN_OPERATION",
            },
            Self::Other { tag } => tag,
        }
    }
}

impl DesignNode {
    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            NodeKind::Text(props) => Some(props),
            _ => None,
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, NodeKind::Frame)
    }

    /// Content of the first direct child that carries non-empty text
    pub fn first_child_text(&self) -> Option<&str> {
        self.children
            .iter()
            .filter(|c| c.visible)
            .filter_map(|c| c.text())
            .map(|t| t.characters.trim())
            .find(|s| !s.is_empty())
    }

    /// Depth-first search by id
    pub fn find(&self, id: &str) -> Option<&DesignNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// All visible text in this subtree, in traversal order
    pub fn collect_text(&self, out: &mut Vec<String>) {
        if !self.visible {
            return;
        }
        if let Some(text) = self.text() {
            out.push(text.characters.clone());
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}
