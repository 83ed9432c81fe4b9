use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight sRGB colour with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            f.write_str(&self.hex())
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Flat tones used by the generator to fake directional shading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub light: Color,
    pub dark: Color,
    pub shadow: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xF1, 0xEC, 0xEF),
            light: Color::rgb(0xF1, 0xEC, 0xEF),
            dark: Color::rgb(0xD3, 0xCF, 0xD1),
            shadow: Color::rgba(0, 0, 0, 0.2),
        }
    }
}

/// Outline parameters handed to the hand-drawn backend.
///
/// Bowing is scaled inversely with on-screen size:
/// `bowing = bowing_scale / (sqrt(diagonal) * bowing_falloff)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// Roughness for open polylines.
    pub roughness: f64,
    /// Roughness for filled polygons.
    pub fill_roughness: f64,
    pub bowing_scale: f64,
    pub bowing_falloff: f64,
    pub disable_multi_stroke: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x04, 0x01, 0x06),
            width: 2.0,
            roughness: 1.0,
            fill_roughness: 0.5,
            bowing_scale: 0.1,
            bowing_falloff: 0.006,
            disable_multi_stroke: true,
        }
    }
}

impl StrokeStyle {
    /// Bowing for a shape whose projected bounding box has the given diagonal.
    /// Degenerate (zero-extent) shapes get no bowing.
    pub fn bowing_for(&self, diagonal: f64) -> f64 {
        if diagonal <= 0.0 || !diagonal.is_finite() {
            return 0.0;
        }
        self.bowing_scale / (diagonal.sqrt() * self.bowing_falloff)
    }
}
