//! Button qualification for a single frame subtree

use uxlens_core::domain::{DesignNode, DetectedElement, ElementKind, ElementSource, NodeKind};

use crate::domain::DetectionError;
use crate::infrastructure::patterns::is_button_name;

/// Walk one frame. A qualifying node is reported once and not descended into.
pub fn detect_buttons_in_frame(
    frame: &DesignNode,
    max_depth: usize,
) -> Result<Vec<DetectedElement>, DetectionError> {
    let mut found = Vec::new();
    walk(frame, frame, 0, max_depth, &mut found)?;
    Ok(found)
}

fn walk(
    frame: &DesignNode,
    node: &DesignNode,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<DetectedElement>,
) -> Result<(), DetectionError> {
    if depth > max_depth {
        return Err(DetectionError::DepthExceeded {
            frame_id: frame.id.clone(),
            max_depth,
        });
    }
    if !node.visible {
        return Ok(());
    }
    // The frame itself is the screen, never a button
    if depth > 0 && is_button(node) {
        found.push(DetectedElement::new(
            ElementKind::Button,
            button_label(node),
            ElementSource {
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                node_type: node.kind.tag().to_string(),
            },
        ));
        return Ok(());
    }
    for child in &node.children {
        walk(frame, child, depth + 1, max_depth, found)?;
    }
    Ok(())
}

/// Containers named like a button, or tagged `role`/`type` = button
fn is_button(node: &DesignNode) -> bool {
    let container = matches!(
        node.kind,
        NodeKind::Frame
            | NodeKind::Group
            | NodeKind::Component
            | NodeKind::ComponentSet
            | NodeKind::Instance
    ) || matches!(node.kind, NodeKind::Shape { .. }) && !node.children.is_empty();

    if !container {
        return false;
    }
    is_button_name(&node.name)
        || node.component_properties.iter().any(|(key, value)| {
            let key = key.to_ascii_lowercase();
            (key.starts_with("role") || key.starts_with("type"))
                && value.eq_ignore_ascii_case("button")
        })
}

/// First text in the subtree, falling back to the node name
fn button_label(node: &DesignNode) -> String {
    let mut texts = Vec::new();
    node.collect_text(&mut texts);
    texts
        .into_iter()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| node.name.clone())
}
