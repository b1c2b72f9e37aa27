//! Contrast & accessibility scorer
//!
//! Purely descriptive: every text node gets a result, nothing is filtered out for scoring
//! low.

pub mod contrast;

use tracing::{debug, instrument};

use uxlens_core::domain::{
    Color, ContrastScore, Frame, FrameAccessibility, FrameChild, TextAccessibility,
};

use self::contrast::{compliance, contrast_ratio, is_large_text};

#[derive(Debug, Default, Clone, Copy)]
pub struct ContrastScorer;

impl ContrastScorer {
    pub fn new() -> Self {
        Self
    }

    /// Fill in contrast for every unscored text node and summarize the frame
    #[instrument(skip_all, fields(frame_id = %frame.id))]
    pub fn score_frame(&self, frame: &mut Frame) -> FrameAccessibility {
        let backgrounds: Vec<Option<Color>> = (0..frame.children.len())
            .map(|i| match &frame.children[i] {
                FrameChild::Text(_) => Some(resolve_background(frame, i)),
                FrameChild::Other(_) => None,
            })
            .collect();

        let mut texts = Vec::new();
        for (child, background) in frame.children.iter_mut().zip(backgrounds) {
            let (FrameChild::Text(node), Some(background)) = (child, background) else {
                continue;
            };

            if node.contrast().is_none() {
                let ratio = contrast_ratio(node.color, background);
                let large_text = is_large_text(node.font_size, node.bold);
                let (score, level) = compliance(ratio, large_text);
                node.record_contrast(ContrastScore {
                    ratio,
                    score,
                    level,
                    large_text,
                    background,
                });
            }

            if let Some(result) = node.contrast() {
                texts.push(TextAccessibility {
                    node_id: node.id.clone(),
                    text: node.text.clone(),
                    font_size: node.font_size,
                    bold: node.bold,
                    foreground: node.color.to_hex(),
                    background: result.background.to_hex(),
                    ratio: result.ratio,
                    score: result.score,
                    level: result.level,
                    large_text: result.large_text,
                });
            }
        }

        let average_score = average_score(texts.iter().map(|t| t.score));
        debug!(
            texts = texts.len(),
            average_score, "Scored frame contrast"
        );

        FrameAccessibility {
            average_score,
            texts,
        }
    }
}

/// Effective background of the text node at `index`.
///
/// The nearest preceding shape (in paint order) with a visible fill whose box contains the
/// text's origin wins; otherwise the frame background. This is a sibling-order
/// approximation, not geometric compositing.
pub fn resolve_background(frame: &Frame, index: usize) -> Color {
    let Some(FrameChild::Text(text)) = frame.children.get(index) else {
        return frame.background;
    };
    let Some(origin) = text.bounds else {
        return frame.background;
    };

    frame.children[..index]
        .iter()
        .rev()
        .find_map(|child| match child {
            FrameChild::Other(shape) => {
                let fill = shape.fill.filter(|c| c.a > 0.0)?;
                let bounds = shape.bounds?;
                bounds
                    .contains_point(origin.x, origin.y)
                    .then_some(Color { a: 1.0, ..fill })
            }
            FrameChild::Text(_) => None,
        })
        .unwrap_or(frame.background)
}

/// Rounded arithmetic mean; 0 for no scores
pub fn average_score(scores: impl Iterator<Item = u8>) -> u8 {
    let (sum, count) = scores.fold((0u32, 0u32), |(sum, count), s| (sum + s as u32, count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u8
}
