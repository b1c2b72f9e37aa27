//! Raw design document builders

use serde_json::{Value, json};

pub fn document(pages: Vec<Value>) -> Value {
    json!({
        "id": "0:0",
        "name": "Document",
        "type": "DOCUMENT",
        "children": [{
            "id": "0:1",
            "name": "Page 1",
            "type": "CANVAS",
            "children": pages,
        }]
    })
}

pub fn frame(id: &str, name: &str, width: f64, height: f64, children: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "FRAME",
        "absoluteBoundingBox": {"x": 0.0, "y": 0.0, "width": width, "height": height},
        "children": children,
    })
}

pub fn screen(id: &str, name: &str, children: Vec<Value>) -> Value {
    frame(id, name, 375.0, 812.0, children)
}

pub fn text(id: &str, characters: &str, font_size: f64, hex: &str) -> Value {
    let (r, g, b) = rgb(hex);
    json!({
        "id": id,
        "name": characters,
        "type": "TEXT",
        "characters": characters,
        "absoluteBoundingBox": {"x": 24.0, "y": 40.0, "width": 200.0, "height": 24.0},
        "style": {"fontSize": font_size, "fontWeight": 400},
        "fills": [{"type": "SOLID", "color": {"r": r, "g": g, "b": b, "a": 1.0}}],
    })
}

pub fn rectangle(id: &str, hex: &str, x: f64, y: f64, width: f64, height: f64) -> Value {
    let (r, g, b) = rgb(hex);
    json!({
        "id": id,
        "name": "Background",
        "type": "RECTANGLE",
        "absoluteBoundingBox": {"x": x, "y": y, "width": width, "height": height},
        "fills": [{"type": "SOLID", "color": {"r": r, "g": g, "b": b, "a": 1.0}}],
    })
}

pub fn instance(id: &str, name: &str, children: Vec<Value>) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "INSTANCE",
        "absoluteBoundingBox": {"x": 24.0, "y": 700.0, "width": 327.0, "height": 48.0},
        "children": children,
    })
}

fn rgb(hex: &str) -> (f64, f64, f64) {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).expect("valid hex") as f64 / 255.0;
    (channel(0), channel(2), channel(4))
}
