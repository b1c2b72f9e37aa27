//! Accordion detection: single-threaded walk of the whole tree

use uxlens_core::domain::{DesignNode, DetectedElement, ElementKind, ElementSource, NodeKind};

use crate::infrastructure::patterns::is_accordion_name;

/// Every visible node named like an accordion or tagged as one by a component property.
/// Nested accordions are reported separately.
pub fn detect_accordions(root: &DesignNode) -> Vec<DetectedElement> {
    let mut found = Vec::new();
    walk(root, &mut found);
    found
}

fn walk(node: &DesignNode, found: &mut Vec<DetectedElement>) {
    if !node.visible {
        return;
    }
    if is_accordion(node) {
        let label = node
            .first_child_text()
            .map(str::to_string)
            .unwrap_or_else(|| node.name.clone());
        found.push(DetectedElement::new(
            ElementKind::Accordion,
            label,
            ElementSource {
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                node_type: node.kind.tag().to_string(),
            },
        ));
    }
    for child in &node.children {
        walk(child, found);
    }
}

fn is_accordion(node: &DesignNode) -> bool {
    if matches!(node.kind, NodeKind::Text(_)) {
        return false;
    }
    is_accordion_name(&node.name)
        || node
            .component_properties
            .iter()
            .any(|(key, value)| is_accordion_name(key) || value.eq_ignore_ascii_case("accordion"))
}
