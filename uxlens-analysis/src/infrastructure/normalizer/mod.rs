//! Document normalizer
//!
//! Converts the raw node tree into typed [`DesignNode`]s and extracts the frames that are
//! evaluated as screens. Malformed nodes are dropped with a debug log; they never fail the
//! pass.

pub mod raw;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use uxlens_core::domain::{
    Color, DesignNode, Frame, FrameChild, NodeKind, OtherNode, TextNode, TextProps,
};

use self::raw::{RawNode, solid_fill};
use crate::domain::{AnalysisSettings, NormalizeError};
use crate::infrastructure::patterns::is_non_screen_name;

const DEFAULT_FONT_SIZE: f64 = 12.0;
const DEFAULT_FONT_WEIGHT: f64 = 400.0;

/// Output of one normalization pass
#[derive(Debug, Clone, Default)]
pub struct NormalizedDocument {
    /// `None` for an empty document
    pub root: Option<DesignNode>,
    pub frames: Vec<Frame>,
    /// Typed subtree of each frame, same order as `frames`
    pub frame_nodes: Vec<DesignNode>,
    /// Nodes dropped because they were malformed or too deep
    pub skipped_nodes: usize,
}

pub struct DocumentNormalizer {
    min_frame_dimension: f64,
    max_depth: usize,
}

impl DocumentNormalizer {
    pub fn new(min_frame_dimension: f64, max_depth: usize) -> Self {
        Self {
            min_frame_dimension,
            max_depth,
        }
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self::new(settings.min_frame_dimension, settings.max_tree_depth)
    }

    /// Normalize a raw document. `null` and `{}` are empty documents.
    #[instrument(skip_all)]
    pub fn normalize(&self, document: &Value) -> Result<NormalizedDocument, NormalizeError> {
        match document {
            Value::Null => return Ok(NormalizedDocument::default()),
            Value::Object(map) if map.is_empty() => return Ok(NormalizedDocument::default()),
            Value::Object(_) => {}
            other => {
                return Err(NormalizeError::InvalidRoot {
                    found: json_kind(other).to_string(),
                });
            }
        }

        let mut skipped = 0;
        let root = self.convert(document, 0, &mut skipped);

        let mut frame_nodes = Vec::new();
        if let Some(root) = &root {
            self.collect_frames(root, &mut frame_nodes);
        }
        let frames = frame_nodes.iter().map(build_frame).collect::<Vec<_>>();

        debug!(
            frames = frames.len(),
            skipped_nodes = skipped,
            "Normalized design document"
        );

        Ok(NormalizedDocument {
            root,
            frames,
            frame_nodes,
            skipped_nodes: skipped,
        })
    }

    fn convert(&self, value: &Value, depth: usize, skipped: &mut usize) -> Option<DesignNode> {
        let raw = match RawNode::deserialize_lenient(value) {
            Some(raw) => raw,
            None => {
                *skipped += 1;
                return None;
            }
        };

        let Some(tag) = raw.node_type.as_deref().filter(|t| !t.is_empty()) else {
            debug!(node_id = ?raw.id, "Skipping node without a type");
            *skipped += 1;
            return None;
        };

        let kind = if tag == "TEXT" {
            NodeKind::Text(TextProps {
                characters: raw.characters.clone().unwrap_or_default(),
                font_size: raw
                    .style
                    .as_ref()
                    .and_then(|s| s.font_size)
                    .unwrap_or(DEFAULT_FONT_SIZE),
                font_weight: raw
                    .style
                    .as_ref()
                    .and_then(|s| s.font_weight)
                    .unwrap_or(DEFAULT_FONT_WEIGHT),
                color: solid_fill(raw.fills.as_deref()),
            })
        } else {
            NodeKind::from_tag(tag)
        };

        // A text node's fill is its foreground, carried in TextProps
        let fill = match kind {
            NodeKind::Text(_) => None,
            _ => solid_fill(raw.fills.as_deref())
                .or_else(|| raw.background_color.map(|c| c.to_color())),
        };

        let raw_children = value
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let children = if depth >= self.max_depth {
            if !raw_children.is_empty() {
                warn!(
                    node_id = ?raw.id,
                    dropped = raw_children.len(),
                    max_depth = self.max_depth,
                    "Tree depth limit reached, dropping children"
                );
                *skipped += raw_children.len();
            }
            Vec::new()
        } else {
            raw_children
                .iter()
                .filter_map(|child| self.convert(child, depth + 1, skipped))
                .collect()
        };

        Some(DesignNode {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            visible: raw.visible.unwrap_or(true),
            bounds: raw.absolute_bounding_box.and_then(|b| b.to_bounds()),
            fill,
            kind,
            component_properties: raw
                .component_properties
                .map(|props| {
                    props
                        .into_iter()
                        .map(|(k, v)| {
                            let value = v.value_string();
                            (k, value)
                        })
                        .collect()
                })
                .unwrap_or_default(),
            children,
        })
    }

    /// Depth-first. A qualifying frame is taken whole; frames nested inside it are part of
    /// that screen. Hidden subtrees are ignored.
    fn collect_frames(&self, node: &DesignNode, out: &mut Vec<DesignNode>) {
        if !node.visible {
            return;
        }
        if self.is_screen_frame(node) {
            out.push(node.clone());
            return;
        }
        for child in &node.children {
            self.collect_frames(child, out);
        }
    }

    fn is_screen_frame(&self, node: &DesignNode) -> bool {
        node.is_frame()
            && node
                .bounds
                .is_none_or(|b| b.meets_min_dimension(self.min_frame_dimension))
            && !is_non_screen_name(&node.name)
    }
}

impl RawNode {
    fn deserialize_lenient(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        // Borrowing deserializer; children are read from `value` by the caller
        match RawNode::deserialize(value) {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!(error = %e, "Skipping malformed node");
                None
            }
        }
    }
}

fn build_frame(node: &DesignNode) -> Frame {
    let mut children = Vec::new();
    flatten_children(&node.children, &mut children);

    Frame {
        id: node.id.clone(),
        name: node.name.clone(),
        bounds: node.bounds,
        background: node
            .fill
            .filter(|c| c.a > 0.0)
            .map(|c| Color { a: 1.0, ..c })
            .unwrap_or(Color::WHITE),
        children,
    }
}

/// Pre-order, so every node precedes its descendants (paint order)
fn flatten_children(nodes: &[DesignNode], out: &mut Vec<FrameChild>) {
    for node in nodes.iter().filter(|n| n.visible) {
        match &node.kind {
            NodeKind::Text(props) => {
                if props.characters.trim().is_empty() {
                    continue;
                }
                out.push(FrameChild::Text(TextNode::new(
                    node.id.clone(),
                    node.name.clone(),
                    props.characters.clone(),
                    props.font_size,
                    props.is_bold(),
                    props.color.unwrap_or(Color::BLACK),
                    node.bounds,
                )));
            }
            _ => {
                if node.fill.is_some() && node.bounds.is_some() {
                    out.push(FrameChild::Other(OtherNode {
                        id: node.id.clone(),
                        name: node.name.clone(),
                        node_type: node.kind.tag().to_string(),
                        bounds: node.bounds,
                        fill: node.fill,
                    }));
                }
                flatten_children(&node.children, out);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> DocumentNormalizer {
        DocumentNormalizer::new(100.0, 64)
    }

    #[test]
    fn test_empty_documents() {
        assert!(normalizer().normalize(&json!(null)).unwrap().frames.is_empty());
        assert!(normalizer().normalize(&json!({})).unwrap().frames.is_empty());
        assert!(normalizer().normalize(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_text_defaults() {
        let doc = json!({
            "id": "0:0", "type": "DOCUMENT", "children": [{
                "id": "1:1", "type": "FRAME", "name": "Home",
                "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812},
                "children": [{"id": "1:2", "type": "TEXT", "characters": "Welcome"}]
            }]
        });
        let normalized = normalizer().normalize(&doc).unwrap();
        let frame = &normalized.frames[0];
        assert_eq!(frame.background, Color::WHITE);

        let text = frame.text_nodes().next().unwrap();
        assert_eq!(text.color, Color::BLACK);
        assert_eq!(text.font_size, DEFAULT_FONT_SIZE);
        assert!(!text.bold);
        assert!(text.contrast().is_none());
    }

    #[test]
    fn test_depth_limit_drops_children() {
        let doc = json!({
            "id": "0:0", "type": "DOCUMENT", "children": [{
                "id": "1:1", "type": "FRAME", "name": "Deep",
                "children": [{"id": "1:2", "type": "GROUP", "children": [
                    {"id": "1:3", "type": "TEXT", "characters": "too deep"}
                ]}]
            }]
        });
        let normalized = DocumentNormalizer::new(100.0, 2).normalize(&doc).unwrap();
        assert_eq!(normalized.frames.len(), 1);
        assert_eq!(normalized.frames[0].text_nodes().count(), 0);
        assert_eq!(normalized.skipped_nodes, 1);
    }
}
