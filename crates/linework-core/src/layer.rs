//! Layers: named, styleable groupings of entities.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layer identifier.
pub type LayerId = String;

/// Id of the layer that always exists.
pub const DEFAULT_LAYER_ID: &str = "0";

/// Layer color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl LayerColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (alpha is appended only when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for LayerColor {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for LayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for LayerColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<LayerColor> for Color {
    fn from(color: LayerColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Line style used when rendering a layer's entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    /// Dash pattern for rendering, if any.
    pub fn dash_pattern(self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(&[10.0, 4.0]),
        }
    }
}

/// A named grouping of entities with shared styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub color: LayerColor,
    pub visible: bool,
    pub locked: bool,
    pub line_style: LineStyle,
    /// Stroke width in pixels. Always positive.
    pub line_weight: f64,
}

impl Layer {
    /// Create a visible, unlocked, solid layer.
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: LayerColor::white(),
            visible: true,
            locked: false,
            line_style: LineStyle::Solid,
            line_weight: 1.0,
        }
    }

    /// The default layer `"0"`.
    pub fn default_layer() -> Self {
        Self::new(DEFAULT_LAYER_ID, "Default")
    }

    pub fn with_color(mut self, color: LayerColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    pub fn with_line_weight(mut self, line_weight: f64) -> Self {
        self.line_weight = line_weight;
        self
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_LAYER_ID
    }

    pub(crate) fn weight_is_valid(weight: f64) -> bool {
        weight.is_finite() && weight > 0.0
    }

    /// Merge a patch into this layer.
    pub(crate) fn apply(&mut self, patch: LayerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(line_style) = patch.line_style {
            self.line_style = line_style;
        }
        if let Some(line_weight) = patch.line_weight {
            self.line_weight = line_weight;
        }
    }
}

/// Partial update for a layer. The id cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub color: Option<LayerColor>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub line_style: Option<LineStyle>,
    pub line_weight: Option<f64>,
}

impl LayerPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    pub fn color(color: LayerColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn line_style(line_style: LineStyle) -> Self {
        Self {
            line_style: Some(line_style),
            ..Self::default()
        }
    }

    pub fn line_weight(line_weight: f64) -> Self {
        Self {
            line_weight: Some(line_weight),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(LayerColor::from_hex("#fff"), Some(LayerColor::white()));
        assert_eq!(
            LayerColor::from_hex("#FF8000"),
            Some(LayerColor::new(255, 128, 0, 255))
        );
        assert_eq!(
            LayerColor::from_hex("#00000080"),
            Some(LayerColor::new(0, 0, 0, 128))
        );
        assert_eq!(LayerColor::from_hex("red"), None);
        assert_eq!(LayerColor::from_hex("#12345"), None);
        assert_eq!(LayerColor::from_hex("#+1+2+3"), None);
        assert_eq!(LayerColor::from_hex("#+f+f+f+f"), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(LayerColor::new(255, 128, 0, 255).to_hex(), "#FF8000");
        assert_eq!(LayerColor::new(0, 0, 0, 128).to_string(), "#00000080");
    }

    #[test]
    fn test_dash_pattern_only_for_dashed() {
        assert!(LineStyle::Solid.dash_pattern().is_none());
        assert_eq!(LineStyle::Dashed.dash_pattern(), Some(&[10.0, 4.0][..]));
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut layer = Layer::new("walls", "Walls");
        layer.apply(LayerPatch {
            name: Some("Outer walls".into()),
            locked: Some(true),
            ..LayerPatch::default()
        });
        assert_eq!(layer.name, "Outer walls");
        assert!(layer.locked);
        assert!(layer.visible);
        assert_eq!(layer.line_weight, 1.0);
    }
}
