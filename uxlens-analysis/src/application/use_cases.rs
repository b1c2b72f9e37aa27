//! Document analysis use case

use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use uxlens_core::domain::{DesignNode, DetectedElement, Frame, FrameAccessibility};

use crate::domain::{AnalysisError, AnalysisSettings, DetectionError};
use crate::infrastructure::detector::{ButtonDetection, ElementDetector, detect_accordions};
use crate::infrastructure::normalizer::DocumentNormalizer;
use crate::infrastructure::scorer::ContrastScorer;

/// Everything the deterministic pass knows about one frame
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Position in document order
    pub index: usize,
    /// Frame with contrast recorded on every text node
    pub frame: Frame,
    /// Typed subtree of the frame
    pub node: DesignNode,
    pub accessibility: FrameAccessibility,
    /// Outcome of this frame's button worker
    pub buttons: Result<Vec<DetectedElement>, DetectionError>,
    /// Accordions inside this frame's subtree
    pub accordions: Vec<DetectedElement>,
    pub theme_keywords: Vec<String>,
}

impl FrameAnalysis {
    /// Buttons then accordions. A failed button worker contributes nothing.
    pub fn elements(&self) -> Vec<DetectedElement> {
        self.buttons
            .as_ref()
            .map(|b| b.as_slice())
            .unwrap_or_default()
            .iter()
            .chain(self.accordions.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentAnalysis {
    pub frames: Vec<FrameAnalysis>,
    /// Buttons in frame order followed by every accordion in the document
    pub elements: Vec<DetectedElement>,
    pub skipped_nodes: usize,
}

impl DocumentAnalysis {
    pub fn frame(&self, frame_id: &str) -> Option<&FrameAnalysis> {
        self.frames.iter().find(|f| f.frame.id == frame_id)
    }
}

/// Normalize a document, then score contrast and detect elements concurrently
pub struct AnalyzeDocumentUseCase {
    settings: AnalysisSettings,
    normalizer: DocumentNormalizer,
    scorer: ContrastScorer,
    detector: ElementDetector,
}

impl AnalyzeDocumentUseCase {
    pub fn new(settings: AnalysisSettings) -> Self {
        let normalizer = DocumentNormalizer::from_settings(&settings);
        let detector = ElementDetector::new(settings.max_detection_depth);
        Self {
            settings,
            normalizer,
            scorer: ContrastScorer::new(),
            detector,
        }
    }

    pub async fn execute(&self, document: &Value) -> Result<DocumentAnalysis, AnalysisError> {
        let start_time = Instant::now();
        let normalized = self.normalizer.normalize(document)?;

        let scorer = self.scorer;
        let mut frames = normalized.frames;
        let scoring = tokio::task::spawn_blocking(move || {
            let accessibility = frames
                .iter_mut()
                .map(|frame| scorer.score_frame(frame))
                .collect::<Vec<_>>();
            (frames, accessibility)
        });

        let root = normalized.root.clone();
        let accordions = tokio::task::spawn_blocking(move || {
            root.as_ref().map(detect_accordions).unwrap_or_default()
        });

        let buttons = self.detector.detect_buttons(&normalized.frame_nodes);

        let (scoring, accordions, buttons): (_, _, ButtonDetection) =
            tokio::join!(scoring, accordions, buttons);

        let (frames, accessibility) = scoring.map_err(|e| AnalysisError::TaskFailed {
            message: format!("contrast scoring: {}", e),
        })?;
        let accordions = accordions.map_err(|e| AnalysisError::TaskFailed {
            message: format!("accordion detection: {}", e),
        })?;

        for (frame_id, error) in buttons.failures() {
            warn!(frame_id = %frame_id, error = %error, "Button detection failed for frame");
        }

        let mut elements = buttons.elements();
        elements.extend(accordions.iter().cloned());

        let frames = frames
            .into_iter()
            .zip(accessibility)
            .zip(normalized.frame_nodes)
            .zip(buttons.frames)
            .enumerate()
            .map(|(index, (((frame, accessibility), node), buttons))| {
                let frame_accordions = accordions
                    .iter()
                    .filter(|a| node.find(&a.source().node_id).is_some())
                    .cloned()
                    .collect();
                let theme_keywords = self.settings.theme_keywords.matches(&node);
                FrameAnalysis {
                    index,
                    frame,
                    node,
                    accessibility,
                    buttons: buttons.result,
                    accordions: frame_accordions,
                    theme_keywords,
                }
            })
            .collect::<Vec<_>>();

        info!(
            frames = frames.len(),
            elements = elements.len(),
            skipped_nodes = normalized.skipped_nodes,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Document analysis completed"
        );

        Ok(DocumentAnalysis {
            frames,
            elements,
            skipped_nodes: normalized.skipped_nodes,
        })
    }
}
