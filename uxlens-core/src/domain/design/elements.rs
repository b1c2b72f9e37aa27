//! Interactive elements found by the detector

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Button,
    Accordion,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Accordion => "accordion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ElementSource {
    pub node_id: String,
    pub node_name: String,
    pub node_type: String,
}

/// A detected button or accordion, one per qualifying node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectedElement {
    Button {
        id: String,
        label: String,
        source: ElementSource,
    },
    Accordion {
        id: String,
        label: String,
        source: ElementSource,
    },
}

impl DetectedElement {
    /// Ids are derived from the kind and source node so repeated runs agree
    pub fn new(kind: ElementKind, label: impl Into<String>, source: ElementSource) -> Self {
        let id = format!("{}-{}", kind.as_str(), source.node_id);
        let label = label.into();
        match kind {
            ElementKind::Button => Self::Button { id, label, source },
            ElementKind::Accordion => Self::Accordion { id, label, source },
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Button { .. } => ElementKind::Button,
            Self::Accordion { .. } => ElementKind::Accordion,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Button { id, .. } | Self::Accordion { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Button { label, .. } | Self::Accordion { label, .. } => label,
        }
    }

    pub fn source(&self) -> &ElementSource {
        match self {
            Self::Button { source, .. } | Self::Accordion { source, .. } => source,
        }
    }
}
