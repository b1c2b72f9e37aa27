//! Unit tests for prompt templates and PromptBuilder

use uxlens_core::domain::{DetectedElement, ElementKind, ElementSource};
use uxlens_llm::infrastructure::prompts::{
    CRITIQUE_OUTPUT_SCHEMA, FRAME_CONTEXT_PROMPT, FRAME_PROMPT, PromptBuilder,
};

#[path = "../common/mod.rs"]
mod common;

use common::create_critique_request;

#[test]
fn test_output_schema_names_required_keys() {
    for key in ["overall_score", "summary", "issues", "category_scores"] {
        assert!(CRITIQUE_OUTPUT_SCHEMA.contains(key), "missing {key}");
    }
}

#[test]
fn test_frame_prompt_has_placeholders() {
    for placeholder in [
        "{frame_name}",
        "{frame_index}",
        "{themes}",
        "{average_score}",
        "{contrast_rows}",
        "{elements}",
        "{context}",
    ] {
        assert!(FRAME_PROMPT.contains(placeholder), "missing {placeholder}");
    }
    assert!(FRAME_CONTEXT_PROMPT.contains("{snapshot}"));
}

#[test]
fn test_frame_prompt_lists_only_failing_contrast() {
    let prompt = PromptBuilder::build_frame_prompt(&create_critique_request(1));

    assert!(prompt.contains("**Name**: Sign in"));
    assert!(prompt.contains("**Themes**: login"));
    assert!(prompt.contains("75/100 over 2 text layers"));
    assert!(prompt.contains("\"Forgot password?\": #777777 on #FFFFFF, ratio 2.33, Low-Contrast"));
    assert!(!prompt.contains("Welcome back"));
    assert!(prompt.contains("first-time shopper"));
    assert!(!prompt.contains("{frame_name}"));
    assert!(!prompt.contains("{snapshot}"));
}

#[test]
fn test_frame_prompt_lists_detected_elements() {
    let mut request = create_critique_request(0);
    request.elements = vec![DetectedElement::new(
        ElementKind::Button,
        "Continue",
        ElementSource {
            node_id: "4:1".into(),
            node_name: "Button / Primary".into(),
            node_type: "INSTANCE".into(),
        },
    )];
    request.snapshot = serde_json::Value::Null;

    let prompt = PromptBuilder::build_frame_prompt(&request);
    assert!(prompt.contains("- button: \"Continue\""));
    assert!(!prompt.contains("Audience context"));
}

#[test]
fn test_frame_prompt_without_texts_or_elements() {
    let mut request = create_critique_request(0);
    request.accessibility = Default::default();
    request.theme_keywords.clear();

    let prompt = PromptBuilder::build_frame_prompt(&request);
    assert!(prompt.contains("All text layers meet AA"));
    assert!(prompt.contains("- none"));
    assert!(prompt.contains("**Themes**: none"));
}

#[test]
fn test_frame_prompt_keeps_placeholder_like_design_text() {
    let mut request = create_critique_request(0);
    request.frame_name = "Promo {elements} {average_score}".into();
    request.elements = vec![DetectedElement::new(
        ElementKind::Button,
        "Use code {context}",
        ElementSource {
            node_id: "7:1".into(),
            node_name: "Button".into(),
            node_type: "INSTANCE".into(),
        },
    )];

    let prompt = PromptBuilder::build_frame_prompt(&request);
    assert!(prompt.contains("- **Name**: Promo {elements} {average_score}\n"));
    assert!(prompt.contains("- button: \"Use code {context}\""));
    assert_eq!(prompt.matches("first-time shopper").count(), 1);
}
