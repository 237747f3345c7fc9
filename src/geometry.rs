//! Shared geometric and color primitives used across the engine modules.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A position in chart space: fractional bar index on the time axis plus a price.
///
/// The logical index stays meaningful outside the loaded bar range, so shapes
/// anchored here survive pan, zoom and incoming data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub logical: f64,
    pub price: f64,
}

impl LogicalPoint {
    pub const fn new(logical: f64, price: f64) -> Self {
        Self { logical, price }
    }

    pub fn is_finite(self) -> bool {
        self.logical.is_finite() && self.price.is_finite()
    }
}

/// A position in host media pixels (before pixel-ratio scaling).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`, with or without the leading `#`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let short = |index: usize| {
                    u8::from_str_radix(&hex[index..index + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Lowercase hex; the alpha pair is only written when the color is translucent.
    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Perceived brightness on a 0..=255 scale.
    pub fn luminance(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// Replaces alpha with `opacity` in `[0, 1]`, scaled against the existing alpha.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let alpha = (f64::from(self.a) * opacity).round() as u8;
        Self { a: alpha, ..self }
    }

    pub fn to_unit_rgba(self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            f64::from(self.a) / 255.0,
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_short_long_and_alpha_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("2962ff"), Some(Color::rgb(0x29, 0x62, 0xff)));
        assert_eq!(
            Color::from_hex("#11223380"),
            Some(Color::rgba(0x11, 0x22, 0x33, 0x80))
        );
    }

    #[test]
    fn from_hex_rejects_invalid_values() {
        assert_eq!(Color::from_hex(""), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn from_hex_rejects_sign_characters() {
        assert_eq!(Color::from_hex("#+f+f+f"), None);
        assert_eq!(Color::from_hex("#+fffff"), None);
        assert_eq!(Color::from_hex("+ff"), None);
        assert_eq!(Color::from_hex("#ff00ff+f"), None);
    }

    #[test]
    fn to_hex_omits_alpha_for_opaque_colors() {
        assert_eq!(Color::rgb(0x13, 0x17, 0x22).to_hex(), "#131722");
        assert_eq!(Color::rgba(0, 0, 0, 0x40).to_hex(), "#00000040");
    }

    #[test]
    fn luminance_spans_black_to_white() {
        assert_eq!(Color::BLACK.luminance(), 0.0);
        assert!((Color::WHITE.luminance() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn with_opacity_clamps_into_unit_range() {
        assert_eq!(Color::WHITE.with_opacity(0.0).a, 0);
        assert_eq!(Color::WHITE.with_opacity(1.0).a, 255);
        assert_eq!(Color::WHITE.with_opacity(4.0).a, 255);
        assert_eq!(Color::WHITE.with_opacity(0.5).a, 128);
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let rect = PixelRect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(PixelPoint::new(10.0, 20.0)));
        assert!(rect.contains(PixelPoint::new(110.0, 70.0)));
        assert!(!rect.contains(PixelPoint::new(110.1, 70.0)));
        assert_eq!(rect.center(), PixelPoint::new(60.0, 45.0));
    }
}
