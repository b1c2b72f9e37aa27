//! Untrusted critique JSON → canonical [`CritiqueResult`]
//!
//! Required top-level keys are `overall_score`, `summary` and `issues`. Everything else
//! is optional and defaulted per field. Values are coerced where the intent is clear
//! (numeric strings, heuristic codes like "H3") and dropped where it is not.

use serde_json::{Map, Value};
use tracing::debug;

use uxlens_core::domain::{
    CategoryScores, CritiqueIssue, CritiqueResult, HeuristicCode, Resource, Severity,
};

use crate::domain::{CritiqueParseError, truncate_raw};
use crate::infrastructure::response_parser::ResponseParser;

pub const REQUIRED_KEYS: [&str; 3] = ["overall_score", "summary", "issues"];

pub struct CritiqueNormalizer;

impl CritiqueNormalizer {
    /// Parse raw model text and normalize it for the frame at `frame_index`
    pub fn parse(raw: &str, frame_index: u32) -> Result<CritiqueResult, CritiqueParseError> {
        let object = ResponseParser::parse_object(raw)?;
        Self::normalize(&object, frame_index, raw)
    }

    pub fn normalize(
        object: &Map<String, Value>,
        frame_index: u32,
        raw: &str,
    ) -> Result<CritiqueResult, CritiqueParseError> {
        let missing = REQUIRED_KEYS
            .iter()
            .filter(|key| object.get(**key).is_none_or(Value::is_null))
            .map(|key| key.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(CritiqueParseError::MissingKeys {
                keys: missing,
                raw: truncate_raw(raw),
            });
        }

        let invalid = |field: &str, message: &str| CritiqueParseError::InvalidField {
            field: field.to_string(),
            message: message.to_string(),
            raw: truncate_raw(raw),
        };

        let overall_score = object
            .get("overall_score")
            .and_then(as_score)
            .ok_or_else(|| invalid("overall_score", "expected a number between 0 and 100"))?;

        let summary = match object.get("summary") {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => return Err(invalid("summary", "expected a string")),
        };

        let issues = match object.get("issues") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object())
                .filter_map(issue_from)
                .enumerate()
                .map(|(j, mut issue)| {
                    issue.id = format!("frame{}-issue{}", frame_index, j);
                    issue
                })
                .collect::<Vec<_>>(),
            _ => return Err(invalid("issues", "expected an array")),
        };

        let result = CritiqueResult {
            overall_score,
            summary,
            strengths: string_list(object.get("strengths")),
            weaknesses: string_list(object.get("weaknesses")),
            issues,
            category_scores: object
                .get("category_scores")
                .and_then(Value::as_object)
                .map(category_scores)
                .unwrap_or_default(),
            resources: object
                .get("resources")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(resource_from).collect())
                .unwrap_or_default(),
        };

        debug!(
            frame_index,
            overall_score = result.overall_score,
            issues = result.issues.len(),
            "Normalized critique"
        );

        Ok(result)
    }
}

/// Integer or float or numeric string, rounded and clamped to 0-100
fn as_score(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number
        .is_finite()
        .then(|| number.round().clamp(0.0, 100.0) as u8)
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| text_of(Some(v))).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// `suggestion` wins over `suggestions`; a list of suggestions is joined
fn suggestion_of(issue: &Map<String, Value>) -> Option<String> {
    text_of(issue.get("suggestion")).or_else(|| match issue.get("suggestions")? {
        Value::Array(items) => {
            let parts = items
                .iter()
                .filter_map(|v| text_of(Some(v)))
                .collect::<Vec<_>>();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => text_of(Some(other)),
    })
}

fn heuristic_of(issue: &Map<String, Value>) -> Option<HeuristicCode> {
    let value = issue.get("heuristic").or_else(|| issue.get("heuristic_code"))?;
    match value {
        Value::String(s) => HeuristicCode::parse(s),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(HeuristicCode::new),
        _ => None,
    }
}

/// Issues without a message are dropped; the id is assigned by the caller
fn issue_from(issue: &Map<String, Value>) -> Option<CritiqueIssue> {
    let message = text_of(issue.get("message"))
        .or_else(|| text_of(issue.get("description")))
        .or_else(|| text_of(issue.get("issue")))?;

    Some(CritiqueIssue {
        id: String::new(),
        heuristic: heuristic_of(issue),
        severity: issue
            .get("severity")
            .and_then(Value::as_str)
            .and_then(Severity::parse)
            .unwrap_or_default(),
        message,
        suggestion: suggestion_of(issue),
    })
}

fn category_scores(scores: &Map<String, Value>) -> CategoryScores {
    let get = |key: &str| scores.get(key).and_then(as_score);
    CategoryScores {
        accessibility: get("accessibility"),
        typography: get("typography"),
        color: get("color").or_else(|| get("colour")),
        layout: get("layout"),
        hierarchy: get("hierarchy"),
        usability: get("usability"),
    }
}

fn resource_from(value: &Value) -> Option<Resource> {
    match value {
        Value::String(url) if !url.trim().is_empty() => Some(Resource {
            title: url.trim().to_string(),
            url: url.trim().to_string(),
        }),
        Value::Object(obj) => {
            let url = text_of(obj.get("url")).or_else(|| text_of(obj.get("link")))?;
            let title = text_of(obj.get("title")).unwrap_or_else(|| url.clone());
            Some(Resource { title, url })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(87), Some(87))]
    #[case(json!(87.6), Some(88))]
    #[case(json!("72"), Some(72))]
    #[case(json!("65%"), Some(65))]
    #[case(json!(140), Some(100))]
    #[case(json!(-3), Some(0))]
    #[case(json!("high"), None)]
    #[case(json!(true), None)]
    fn test_score_coercion(#[case] value: Value, #[case] expected: Option<u8>) {
        assert_eq!(as_score(&value), expected);
    }

    #[test]
    fn test_suggestions_are_unified() {
        let issue = json!({"message": "m", "suggestions": ["Increase size", "Add label"]});
        assert_eq!(
            suggestion_of(issue.as_object().unwrap()).as_deref(),
            Some("Increase size; Add label")
        );

        let issue = json!({"message": "m", "suggestion": "Use 16px", "suggestions": ["x"]});
        assert_eq!(
            suggestion_of(issue.as_object().unwrap()).as_deref(),
            Some("Use 16px")
        );
    }

    #[test]
    fn test_heuristic_forms() {
        let code = |v: Value| heuristic_of(json!({ "heuristic": v }).as_object().unwrap());
        assert_eq!(code(json!("4")).unwrap().as_str(), "04");
        assert_eq!(code(json!(10)).unwrap().as_str(), "10");
        assert_eq!(code(json!("H2")).unwrap().as_str(), "02");
        assert!(code(json!("11")).is_none());
        assert!(code(json!(null)).is_none());
    }

    #[test]
    fn test_null_required_key_counts_as_missing() {
        let obj = json!({"overall_score": 50, "summary": null, "issues": []});
        let err = CritiqueNormalizer::normalize(obj.as_object().unwrap(), 0, "raw").unwrap_err();
        assert_eq!(
            err,
            CritiqueParseError::MissingKeys {
                keys: vec!["summary".into()],
                raw: "raw".into()
            }
        );
    }
}
