//! Wire format of the design tool's node JSON
//!
//! Every field is optional. `children` is not part of the struct: the normalizer walks
//! it on the source JSON so a malformed child can be dropped without failing its parent.

use serde::Deserialize;
use std::collections::BTreeMap;

use uxlens_core::domain::{BoundingBox, Color};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub visible: Option<bool>,
    pub absolute_bounding_box: Option<RawBounds>,
    pub fills: Option<Vec<RawPaint>>,
    pub background_color: Option<RawColor>,
    pub characters: Option<String>,
    pub style: Option<RawTypeStyle>,
    pub component_properties: Option<BTreeMap<String, RawComponentProperty>>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RawBounds {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTypeStyle {
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawComponentProperty {
    pub value: serde_json::Value,
}

impl RawBounds {
    /// Both dimensions are required; a missing origin is treated as 0
    pub fn to_bounds(self) -> Option<BoundingBox> {
        Some(BoundingBox::new(
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
            self.width?,
            self.height?,
        ))
    }
}

impl RawColor {
    pub fn to_color(self) -> Color {
        Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a.unwrap_or(1.0),
        }
        .clamped()
    }
}

/// First visible SOLID paint, with paint opacity folded into alpha
pub fn solid_fill(fills: Option<&[RawPaint]>) -> Option<Color> {
    fills?
        .iter()
        .filter(|p| p.visible.unwrap_or(true))
        .filter(|p| p.paint_type.as_deref().unwrap_or("SOLID") == "SOLID")
        .find_map(|p| {
            let mut color = p.color?.to_color();
            color.a = (color.a * p.opacity.unwrap_or(1.0)).clamp(0.0, 1.0);
            Some(color)
        })
}

impl RawComponentProperty {
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
