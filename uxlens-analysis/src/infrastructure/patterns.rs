//! Node-name patterns shared by the normalizer and the detector
//!
//! Compiled once with once_cell.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name tokens that disqualify a FRAME from being treated as a screen
static NON_SCREEN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(icons?|avatars?|logos?|buttons?|btns?)$").expect("valid regex")
});

static BUTTON_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(button|btn|\bcta\b)").expect("valid regex"));

static ACCORDION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)accordion").expect("valid regex"));

/// Whole-token match, so "Silicon Valley" stays a screen while "IconButton" does not
pub fn is_non_screen_name(name: &str) -> bool {
    name_tokens(name)
        .iter()
        .any(|token| NON_SCREEN_TOKEN.is_match(token))
}

/// Split a layer name on separators, letter/digit changes and camelCase humps.
/// An acronym ends before the capital that starts the next word ("IOSButton" is
/// "IOS", "Button").
pub fn name_tokens(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower)
                || (prev.is_alphabetic() != c.is_alphabetic());
            if boundary {
                tokens.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

pub fn is_button_name(name: &str) -> bool {
    BUTTON_NAME.is_match(name)
}

pub fn is_accordion_name(name: &str) -> bool {
    ACCORDION_NAME.is_match(name)
}
