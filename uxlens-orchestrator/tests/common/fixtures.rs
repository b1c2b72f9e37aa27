//! Test data fixtures for uxlens-orchestrator

use serde_json::{Value, json};

pub const SIGN_IN: &str = "1:1";
pub const CART: &str = "1:2";
pub const CHECKOUT: &str = "1:3";

pub const PLACEHOLDER_IMAGE: &str = "https://images.example.com/placeholder.png";

pub fn critique_json(overall_score: u8, summary: &str) -> String {
    json!({
        "overall_score": overall_score,
        "summary": summary,
        "strengths": ["Single primary action"],
        "weaknesses": ["Low contrast helper text"],
        "issues": [
            {"heuristic": "H4", "severity": "high", "description": "Helper link fails contrast"}
        ],
        "category_scores": {"accessibility": 55, "layout": 80}
    })
    .to_string()
}

pub const MALFORMED_CRITIQUE: &str = "I think this screen looks great overall!";

fn text(id: &str, characters: &str) -> Value {
    json!({
        "id": id,
        "name": characters,
        "type": "TEXT",
        "characters": characters,
        "absoluteBoundingBox": {"x": 24.0, "y": 40.0, "width": 200.0, "height": 24.0},
        "style": {"fontSize": 16.0, "fontWeight": 400},
        "fills": [{"type": "SOLID", "color": {"r": 0.1, "g": 0.1, "b": 0.1, "a": 1.0}}],
    })
}

pub fn screen(id: &str, name: &str, label: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "FRAME",
        "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": 375.0, "height": 812.0},
        "fills": [{"type": "SOLID", "color": {"r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0}}],
        "children": [text(&format!("{}:t", id), label)],
    })
}

pub fn document(frames: Vec<Value>) -> Value {
    json!({
        "id": "0:0",
        "name": "Document",
        "type": "DOCUMENT",
        "children": [{
            "id": "0:1",
            "name": "Page 1",
            "type": "CANVAS",
            "children": frames,
        }]
    })
}

/// Sign in, cart and checkout screens
pub fn three_frame_document() -> Value {
    document(vec![
        screen(SIGN_IN, "Sign in", "Welcome back"),
        screen(CART, "Cart", "Your cart"),
        screen(CHECKOUT, "Checkout", "Pay now"),
    ])
}
