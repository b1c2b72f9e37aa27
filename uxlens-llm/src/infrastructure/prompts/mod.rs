//! Critique prompt templates

mod templates;

pub use templates::*;

use uxlens_core::domain::ComplianceLevel;

use crate::domain::CritiqueRequest;

/// Contrast rows listed in the prompt, worst first
const MAX_CONTRAST_ROWS: usize = 12;

pub struct PromptBuilder;

impl PromptBuilder {
    /// Persona plus heuristics, followed by the output schema
    pub fn build_system_prompt() -> String {
        let heuristics = USABILITY_HEURISTICS
            .iter()
            .map(|(code, name)| format!("- {}: {}", code, name))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n{}",
            CRITIQUE_SYSTEM_PROMPT.replace("{heuristics}", &heuristics),
            CRITIQUE_OUTPUT_SCHEMA
        )
    }

    pub fn build_frame_prompt(request: &CritiqueRequest) -> String {
        let accessibility = &request.accessibility;

        let mut failing = accessibility
            .texts
            .iter()
            .filter(|t| !matches!(t.level, ComplianceLevel::Aaa | ComplianceLevel::Aa))
            .collect::<Vec<_>>();
        failing.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));

        let contrast_rows = if failing.is_empty() {
            "- All text layers meet AA".to_string()
        } else {
            failing
                .iter()
                .take(MAX_CONTRAST_ROWS)
                .map(|t| {
                    format!(
                        "- \"{}\": {} on {}, ratio {:.2}, {}",
                        t.text.trim(),
                        t.foreground,
                        t.background,
                        t.ratio,
                        t.level
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let elements = if request.elements.is_empty() {
            "- none".to_string()
        } else {
            request
                .elements
                .iter()
                .map(|e| format!("- {}: \"{}\"", e.kind().as_str(), e.label()))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let themes = if request.theme_keywords.is_empty() {
            "none".to_string()
        } else {
            request.theme_keywords.join(", ")
        };

        let context = if request.snapshot.is_null()
            || request.snapshot.as_object().is_some_and(|o| o.is_empty())
        {
            String::new()
        } else {
            let snapshot = serde_json::to_string_pretty(&request.snapshot)
                .unwrap_or_else(|_| request.snapshot.to_string());
            render(FRAME_CONTEXT_PROMPT, &[("snapshot", &snapshot)])
        };

        render(
            FRAME_PROMPT,
            &[
                ("frame_name", &request.frame_name),
                ("frame_index", &request.frame_index.to_string()),
                ("themes", &themes),
                ("average_score", &accessibility.average_score.to_string()),
                ("text_count", &accessibility.texts.len().to_string()),
                ("contrast_rows", &contrast_rows),
                ("elements", &elements),
                ("context", &context),
            ],
        )
    }
}

/// Fill `{name}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned, so design text that happens to look like a
/// placeholder is kept verbatim. Braces that do not name a known placeholder are copied.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_all_heuristics() {
        let prompt = PromptBuilder::build_system_prompt();
        for (code, name) in USABILITY_HEURISTICS {
            assert!(prompt.contains(&format!("{}: {}", code, name)));
        }
        assert!(prompt.contains("\"overall_score\""));
        assert!(!prompt.contains("{heuristics}"));
    }

    #[test]
    fn test_render_does_not_rescan_inserted_values() {
        let rendered = render(
            "{a} / {b} / {unknown} {",
            &[("a", "{b}"), ("b", "two")],
        );
        assert_eq!(rendered, "{b} / two / {unknown} {");
    }
}
