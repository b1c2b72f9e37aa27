//! Canonical critique result
//!
//! The critique model's output is untrusted. These types describe the shape uxlens keeps
//! after validation, never the raw wire format.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CritiqueResult {
    /// 0-100
    pub overall_score: u8,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub issues: Vec<CritiqueIssue>,
    #[serde(default)]
    pub category_scores: CategoryScores,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CritiqueIssue {
    /// `frame{i}-issue{j}`, assigned locally
    pub id: String,
    pub heuristic: Option<HeuristicCode>,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Case-insensitive, with the synonyms models commonly emit
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "minor" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "high" | "major" | "critical" | "severe" => Some(Self::High),
            _ => None,
        }
    }
}

/// One of the ten usability heuristics, always two digits ("01".."10")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct HeuristicCode(String);

impl HeuristicCode {
    pub fn new(number: u8) -> Option<Self> {
        (1..=10)
            .contains(&number)
            .then(|| Self(format!("{:02}", number)))
    }

    /// Accepts "3", "03", " 03 " and "H3"
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches(['H', 'h']);
        digits.parse::<u8>().ok().and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HeuristicCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid heuristic code: {value}"))
    }
}

impl From<HeuristicCode> for String {
    fn from(code: HeuristicCode) -> Self {
        code.0
    }
}

/// Per-category scores, each 0-100 when present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryScores {
    pub accessibility: Option<u8>,
    pub typography: Option<u8>,
    pub color: Option<u8>,
    pub layout: Option<u8>,
    pub hierarchy: Option<u8>,
    pub usability: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub title: String,
    pub url: String,
}
