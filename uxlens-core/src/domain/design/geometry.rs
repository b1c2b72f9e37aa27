//! Color and geometry value objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RGBA color with channels in `0.0..=1.0`, the design tool's native encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Clamp every channel into `0.0..=1.0`, mapping NaN to 0
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self {
            r: clamp(self.r),
            g: clamp(self.g),
            b: clamp(self.b),
            a: clamp(self.a),
        }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let mut chars = hex.chars();
                let mut next = || {
                    let c = chars.next()?;
                    channel(&format!("{c}{c}"))
                };
                Some(Self::from_rgb8(next()?, next()?, next()?))
            }
            6 | 8 => {
                let mut color =
                    Self::from_rgb8(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?);
                if hex.len() == 8 {
                    color.a = channel(&hex[6..8])? as f64 / 255.0;
                }
                Some(color)
            }
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`, alpha dropped
    pub fn to_hex(&self) -> String {
        let c = self.clamped();
        let to8 = |v: f64| (v * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", to8(c.r), to8(c.g), to8(c.b))
    }
}

/// Axis-aligned box in absolute canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn meets_min_dimension(&self, min: f64) -> bool {
        self.width >= min && self.height >= min
    }
}
