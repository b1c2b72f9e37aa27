//! JSON extraction from model output
//!
//! Models wrap JSON in markdown fences or narrative text often enough that the
//! critique step never feeds raw output to `serde_json` directly.

use serde_json::{Map, Value};

use crate::domain::{CritiqueParseError, truncate_raw};

/// Utilities for extracting and parsing JSON from LLM responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse the first usable JSON object out of a critique response.
    ///
    /// Strategy order:
    /// 1) Try the full trimmed content as JSON.
    /// 2) Extract a fenced JSON code block (```json ... ```).
    /// 3) Extract any fenced code block (``` ... ```).
    /// 4) Extract the first valid JSON object/array found in the text.
    ///
    /// A JSON value that is not an object is reported as such rather than as invalid JSON.
    pub fn parse_object(content: &str) -> Result<Map<String, Value>, CritiqueParseError> {
        let trimmed = content.trim();
        let candidates = [
            Some(trimmed.to_string()),
            Self::extract_fenced_json(trimmed),
            Self::extract_any_fenced_code(trimmed),
            Self::extract_first_json_value(trimmed),
        ];

        let mut first_error = None;
        let mut non_object = false;
        for candidate in candidates.into_iter().flatten() {
            match serde_json::from_str::<Value>(&candidate) {
                Ok(Value::Object(map)) => return Ok(map),
                Ok(_) => non_object = true,
                Err(e) => {
                    first_error.get_or_insert(e.to_string());
                }
            }
        }

        let raw = truncate_raw(content);
        if non_object {
            return Err(CritiqueParseError::NotAnObject { raw });
        }
        Err(CritiqueParseError::InvalidJson {
            message: first_error.unwrap_or_else(|| "empty response".to_string()),
            raw,
        })
    }

    /// Extract a ```json fenced code block.
    pub fn extract_fenced_json(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, Some("json"))
    }

    /// Extract any fenced code block.
    pub fn extract_any_fenced_code(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, None)
    }

    /// Extract the first valid JSON value (object or array) from text.
    ///
    /// Uses `serde_json::Deserializer` to detect a valid JSON prefix.
    pub fn extract_first_json_value(content: &str) -> Option<String> {
        for (idx, ch) in content.char_indices() {
            if ch == '{' || ch == '[' {
                let candidate = &content[idx..];
                let mut de =
                    serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
                if let Some(Ok(_value)) = de.next() {
                    let end = de.byte_offset();
                    if end > 0 && end <= candidate.len() {
                        return Some(candidate[..end].to_string());
                    }
                }
            }
        }
        None
    }

    fn extract_fenced_block(content: &str, language: Option<&str>) -> Option<String> {
        let fence = "```";
        let mut search = content;

        loop {
            let start = search.find(fence)?;
            let after_start = &search[start + fence.len()..];

            // Determine language tag
            let (lang_tag, rest) = if let Some(line_end) = after_start.find('\n') {
                let tag = after_start[..line_end].trim();
                (tag, &after_start[line_end + 1..])
            } else {
                return None;
            };

            if let Some(expected) = language
                && !lang_tag.eq_ignore_ascii_case(expected)
            {
                // Continue scanning after this fence
                search = after_start;
                continue;
            }

            let end = rest.find(fence)?;
            let block = rest[..end].trim().to_string();
            return Some(block);
        }
    }
}
