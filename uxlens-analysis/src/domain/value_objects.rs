//! Analysis value objects

use std::collections::BTreeSet;

use uxlens_core::config::EvaluationConfig;
use uxlens_core::domain::DesignNode;

/// Knobs for a single analysis pass
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub min_frame_dimension: f64,
    /// Normalizer depth limit, from the document root
    pub max_tree_depth: usize,
    /// Button worker depth limit, from the frame
    pub max_detection_depth: usize,
    pub theme_keywords: ThemeKeywords,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from_config(&EvaluationConfig::default())
    }
}

impl AnalysisSettings {
    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self {
            min_frame_dimension: config.min_frame_dimension,
            max_tree_depth: config.max_tree_depth,
            max_detection_depth: config.max_detection_depth,
            theme_keywords: ThemeKeywords::new(config.theme_keywords.iter()),
        }
    }
}

/// Keyword set a frame is classified against.
///
/// Passed in explicitly; matching is case-insensitive on the frame name and its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeKeywords(BTreeSet<String>);

impl ThemeKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keywords found in the frame, in sorted order
    pub fn matches(&self, frame: &DesignNode) -> Vec<String> {
        if self.0.is_empty() {
            return Vec::new();
        }

        let mut texts = vec![frame.name.clone()];
        frame.collect_text(&mut texts);
        let haystack = texts.join("\n").to_lowercase();

        self.0
            .iter()
            .filter(|k| haystack.contains(k.as_str()))
            .cloned()
            .collect()
    }
}
