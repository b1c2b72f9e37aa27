//! Interactive element detector
//!
//! Buttons: one worker task per candidate frame, fanned out on a `JoinSet`. Each worker's
//! outcome is captured on its own, so a failing frame never cancels its siblings, and the
//! results are reassembled by submission index rather than completion order.
//!
//! Accordions: one recursive pass over the whole tree.

pub mod accordion;
pub mod buttons;

use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use uxlens_core::domain::{DesignNode, DetectedElement};

use crate::domain::DetectionError;

pub use self::accordion::detect_accordions;
pub use self::buttons::detect_buttons_in_frame;

/// Outcome of one button worker
#[derive(Debug, Clone, PartialEq)]
pub struct FrameButtons {
    pub frame_id: String,
    /// Submission index
    pub frame_index: usize,
    pub result: Result<Vec<DetectedElement>, DetectionError>,
}

/// All worker outcomes, in frame submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonDetection {
    pub frames: Vec<FrameButtons>,
}

impl ButtonDetection {
    /// Buttons of every successful worker, concatenated in submission order
    pub fn elements(&self) -> Vec<DetectedElement> {
        self.frames
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .flatten()
            .cloned()
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &DetectionError)> {
        self.frames
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.frame_id.as_str(), e)))
    }
}

#[derive(Debug, Clone)]
pub struct ElementDetector {
    max_depth: usize,
}

impl ElementDetector {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Fan out one worker per frame and wait for all of them
    #[instrument(skip_all, fields(frames = frames.len()))]
    pub async fn detect_buttons(&self, frames: &[DesignNode]) -> ButtonDetection {
        let mut join_set: JoinSet<Result<Vec<DetectedElement>, DetectionError>> = JoinSet::new();
        let mut task_index = HashMap::with_capacity(frames.len());

        for (index, frame) in frames.iter().enumerate() {
            let frame = frame.clone();
            let max_depth = self.max_depth;
            let handle = join_set.spawn(async move { detect_buttons_in_frame(&frame, max_depth) });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<Result<Vec<DetectedElement>, DetectionError>>> =
            vec![None; frames.len()];

        while let Some(joined) = join_set.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => {
                    let id = e.id();
                    let frame_id = task_index
                        .get(&id)
                        .and_then(|i| frames.get(*i))
                        .map(|f| f.id.clone())
                        .unwrap_or_default();
                    error!(frame_id = %frame_id, error = %e, "Button detection worker failed");
                    (
                        id,
                        Err(DetectionError::WorkerFailed {
                            frame_id,
                            message: e.to_string(),
                        }),
                    )
                }
            };

            match task_index.get(&id) {
                Some(&index) => slots[index] = Some(result),
                None => warn!(task_id = %id, "Join result for an unknown task"),
            }
        }

        let frames = frames
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(frame_index, (frame, slot))| FrameButtons {
                frame_id: frame.id.clone(),
                frame_index,
                result: slot.unwrap_or_else(|| {
                    Err(DetectionError::WorkerFailed {
                        frame_id: frame.id.clone(),
                        message: "worker produced no result".to_string(),
                    })
                }),
            })
            .collect::<Vec<_>>();

        debug!(
            workers = frames.len(),
            failed = frames.iter().filter(|f| f.result.is_err()).count(),
            "Button detection finished"
        );

        ButtonDetection { frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uxlens_core::domain::{ElementKind, NodeKind, TextProps};

    fn node(id: &str, name: &str, kind: NodeKind, children: Vec<DesignNode>) -> DesignNode {
        DesignNode {
            id: id.into(),
            name: name.into(),
            visible: true,
            bounds: None,
            fill: None,
            kind,
            component_properties: BTreeMap::new(),
            children,
        }
    }

    fn text(id: &str, characters: &str) -> DesignNode {
        node(
            id,
            "label",
            NodeKind::Text(TextProps {
                characters: characters.into(),
                font_size: 14.0,
                font_weight: 400.0,
                color: None,
            }),
            vec![],
        )
    }

    #[tokio::test]
    async fn test_buttons_labelled_by_first_text() {
        let frame = node(
            "1:1",
            "Login",
            NodeKind::Frame,
            vec![node(
                "1:2",
                "Button/Primary",
                NodeKind::Instance,
                vec![node("1:3", "content", NodeKind::Group, vec![text("1:4", "Sign in")])],
            )],
        );

        let detection = ElementDetector::new(32).detect_buttons(&[frame]).await;
        let elements = detection.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].label(), "Sign in");
        assert_eq!(elements[0].kind(), ElementKind::Button);
    }

    #[tokio::test]
    async fn test_failed_worker_does_not_drop_siblings() {
        let shallow = node("1:1", "A", NodeKind::Frame, vec![node("1:2", "btn", NodeKind::Frame, vec![])]);
        let mut deep = node("2:1", "B", NodeKind::Frame, vec![]);
        for i in 0..5 {
            deep = node(&format!("2:{}", i + 2), "wrap", NodeKind::Group, vec![deep]);
        }
        let deep = node("2:0", "Deep", NodeKind::Frame, vec![deep]);
        let trailing = node("3:1", "C", NodeKind::Frame, vec![node("3:2", "CTA", NodeKind::Instance, vec![])]);

        let detection = ElementDetector::new(3)
            .detect_buttons(&[shallow, deep, trailing])
            .await;

        assert!(detection.frames[0].result.is_ok());
        assert!(matches!(
            detection.frames[1].result,
            Err(DetectionError::DepthExceeded { .. })
        ));
        assert!(detection.frames[2].result.is_ok());

        let ids: Vec<String> = detection
            .elements()
            .iter()
            .map(|e| e.source().node_id.clone())
            .collect();
        assert_eq!(ids, vec!["1:2", "3:2"]);
        assert_eq!(detection.failures().count(), 1);
    }

    #[test]
    fn test_accordion_by_name_and_component_property() {
        let mut tagged = node("5:2", "Disclosure", NodeKind::Instance, vec![text("5:3", "Returns")]);
        tagged
            .component_properties
            .insert("Component".into(), "Accordion".into());

        let root = node(
            "0:0",
            "Page",
            NodeKind::Canvas,
            vec![
                node("5:1", "FAQ Accordion", NodeKind::Frame, vec![text("5:4", "Shipping")]),
                tagged,
                node("5:5", "accordion-empty", NodeKind::Group, vec![]),
            ],
        );

        let found = detect_accordions(&root);
        let labels: Vec<&str> = found.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["Shipping", "Returns", "accordion-empty"]);
    }
}
