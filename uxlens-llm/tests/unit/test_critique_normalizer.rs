//! Unit tests for critique validation and normalization

use rstest::rstest;
use uxlens_core::domain::Severity;
use uxlens_llm::domain::CritiqueParseError;
use uxlens_llm::infrastructure::CritiqueNormalizer;

#[path = "../common/mod.rs"]
mod common;

use common::VALID_CRITIQUE;

#[test]
fn test_valid_critique_is_normalized() {
    let critique = CritiqueNormalizer::parse(VALID_CRITIQUE, 2).unwrap();

    assert_eq!(critique.overall_score, 72);
    assert_eq!(critique.summary, "Clear layout with a weak secondary link.");
    assert_eq!(critique.strengths, vec!["Single primary action"]);
    assert_eq!(critique.issues.len(), 2);

    let first = &critique.issues[0];
    assert_eq!(first.id, "frame2-issue0");
    assert_eq!(first.heuristic.as_ref().unwrap().as_str(), "04");
    assert_eq!(first.severity, Severity::High);
    assert_eq!(first.suggestion.as_deref(), Some("Darken to #555555"));

    let second = &critique.issues[1];
    assert_eq!(second.id, "frame2-issue1");
    assert_eq!(second.heuristic.as_ref().unwrap().as_str(), "08");
    assert_eq!(second.severity, Severity::Low);
    assert_eq!(second.message, "Decorative divider adds noise");
    assert!(second.suggestion.is_none());

    assert_eq!(critique.category_scores.accessibility, Some(55));
    assert_eq!(critique.category_scores.layout, Some(80));
    assert_eq!(critique.category_scores.typography, None);
    assert_eq!(critique.resources.len(), 1);
}

#[test]
fn test_fenced_critique_with_prose() {
    let raw = format!(
        "Here is my review of the screen:\n\n```json\n{}\n```\nLet me know if you need more.",
        VALID_CRITIQUE
    );
    let critique = CritiqueNormalizer::parse(&raw, 0).unwrap();
    assert_eq!(critique.overall_score, 72);
    assert_eq!(critique.issues[0].id, "frame0-issue0");
}

#[test]
fn test_missing_required_keys_are_listed() {
    let raw = r#"{"summary": "Looks fine"}"#;
    let err = CritiqueNormalizer::parse(raw, 0).unwrap_err();

    match &err {
        CritiqueParseError::MissingKeys { keys, raw: kept } => {
            assert_eq!(keys, &vec!["overall_score".to_string(), "issues".to_string()]);
            assert_eq!(kept, raw);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.detail().contains("overall_score, issues"));
    assert!(err.detail().contains("raw: {\"summary\""));
}

#[rstest]
#[case("I cannot evaluate this image.")]
#[case("{\"overall_score\": 80, \"summary\": ")]
#[case("")]
fn test_non_json_is_rejected(#[case] raw: &str) {
    let err = CritiqueNormalizer::parse(raw, 0).unwrap_err();
    assert!(matches!(err, CritiqueParseError::InvalidJson { .. }));
}

#[test]
fn test_array_is_not_a_critique() {
    let err = CritiqueNormalizer::parse("[1, 2, 3]", 0).unwrap_err();
    assert!(matches!(err, CritiqueParseError::NotAnObject { .. }));
}

#[rstest]
#[case(r#"{"overall_score": "great", "summary": "s", "issues": []}"#, "overall_score")]
#[case(r#"{"overall_score": 50, "summary": 7, "issues": []}"#, "summary")]
#[case(r#"{"overall_score": 50, "summary": "s", "issues": "none"}"#, "issues")]
fn test_unusable_required_field(#[case] raw: &str, #[case] expected_field: &str) {
    match CritiqueNormalizer::parse(raw, 0).unwrap_err() {
        CritiqueParseError::InvalidField { field, .. } => assert_eq!(field, expected_field),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_issues_without_message_are_dropped_and_ids_stay_dense() {
    let raw = r#"{
        "overall_score": 140,
        "summary": "s",
        "issues": [
            {"severity": "high"},
            "not an object",
            {"message": "Primary button is too small", "severity": "urgent", "suggestions": ["Use 44px", "Add padding"]}
        ]
    }"#;
    let critique = CritiqueNormalizer::parse(raw, 5).unwrap();

    assert_eq!(critique.overall_score, 100);
    assert_eq!(critique.issues.len(), 1);
    let issue = &critique.issues[0];
    assert_eq!(issue.id, "frame5-issue0");
    assert_eq!(issue.severity, Severity::Medium);
    assert!(issue.heuristic.is_none());
    assert_eq!(issue.suggestion.as_deref(), Some("Use 44px; Add padding"));
}

#[test]
fn test_optional_fields_default_when_malformed() {
    let raw = r#"{
        "overall_score": 61.4,
        "summary": "  Busy header.  ",
        "issues": [],
        "strengths": [1, "Readable body copy", ""],
        "weaknesses": "Crowded header",
        "category_scores": [10, 20],
        "resources": ["https://example.com/guide", {"title": "No url"}, 3]
    }"#;
    let critique = CritiqueNormalizer::parse(raw, 0).unwrap();

    assert_eq!(critique.overall_score, 61);
    assert_eq!(critique.summary, "Busy header.");
    assert_eq!(critique.strengths, vec!["Readable body copy"]);
    assert_eq!(critique.weaknesses, vec!["Crowded header"]);
    assert_eq!(critique.category_scores, Default::default());
    assert_eq!(critique.resources.len(), 1);
    assert_eq!(critique.resources[0].url, "https://example.com/guide");
}

#[test]
fn test_raw_detail_is_truncated() {
    let raw = format!("not json {}", "x".repeat(5000));
    let err = CritiqueNormalizer::parse(&raw, 0).unwrap_err();
    assert!(err.raw().chars().count() < 2100);
    assert!(err.raw().ends_with('…'));
}
