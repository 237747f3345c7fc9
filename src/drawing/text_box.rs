use super::{Color, LogicalPoint};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_WEIGHT: &str = "normal";
pub const DEFAULT_BACKGROUND_OPACITY: f64 = 0.8;
pub const DEFAULT_BORDER_WIDTH: f64 = 1.0;
pub const DEFAULT_WIDTH: f64 = 200.0;
pub const DEFAULT_HEIGHT: f64 = 80.0;
pub const DEFAULT_PADDING: f64 = 8.0;

pub const LIGHT_TEXT_COLOR: Color = Color::WHITE;
pub const DARK_TEXT_COLOR: Color = Color::rgb(0x13, 0x17, 0x22);

/// Backgrounds brighter than this get dark text.
const LUMINANCE_THRESHOLD: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A styled, fixed-pixel-size text box anchored at its top-left chart point.
///
/// Only the anchor reprojects with the chart; `width`, `height`, `padding` and
/// `font_size` stay in pixels regardless of zoom. `rotation` is in degrees and
/// is applied around the box center when painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub point: LogicalPoint,
    #[serde(default)]
    pub text: String,
    /// Explicit text color; derived from the background when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f64,
    #[serde(default = "default_true")]
    pub background_enabled: bool,
    #[serde(default)]
    pub border_enabled: bool,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub text_wrap: bool,
    #[serde(default = "default_padding")]
    pub padding: f64,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_weight() -> String {
    DEFAULT_FONT_WEIGHT.to_string()
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_background_opacity() -> f64 {
    DEFAULT_BACKGROUND_OPACITY
}

fn default_border_color() -> Color {
    Color::WHITE
}

fn default_border_width() -> f64 {
    DEFAULT_BORDER_WIDTH
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

fn default_padding() -> f64 {
    DEFAULT_PADDING
}

const fn default_true() -> bool {
    true
}

impl TextBox {
    pub fn new(point: LogicalPoint, text: impl Into<String>) -> Self {
        Self {
            point,
            text: text.into(),
            color: None,
            font_size: DEFAULT_FONT_SIZE,
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            text_align: TextAlign::Left,
            background_color: default_background_color(),
            background_opacity: DEFAULT_BACKGROUND_OPACITY,
            background_enabled: true,
            border_enabled: false,
            border_color: default_border_color(),
            border_width: DEFAULT_BORDER_WIDTH,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rotation: 0.0,
            text_wrap: true,
            padding: DEFAULT_PADDING,
        }
    }

    /// A copy of `template` placed at `point`.
    pub fn from_template(template: &TextBox, point: LogicalPoint) -> Self {
        Self {
            point,
            ..template.clone()
        }
    }

    pub fn set_background_opacity(&mut self, opacity: f64) {
        self.background_opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_BACKGROUND_OPACITY
        };
    }

    /// Text wraps against the box width minus padding on both sides.
    pub fn wrap_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    pub fn is_bold(&self) -> bool {
        match self.font_weight.trim() {
            "bold" | "bolder" => true,
            weight => weight.parse::<u16>().is_ok_and(|value| value >= 600),
        }
    }

    pub fn is_underlined(&self) -> bool {
        self.text_decoration == TextDecoration::Underline
    }

    /// Explicit color wins; otherwise pick light or dark text against whatever
    /// is behind it: the box background when enabled, the chart otherwise.
    pub fn resolved_text_color(&self, chart_background: Color) -> Color {
        if let Some(color) = self.color {
            return color;
        }
        let backdrop = if self.background_enabled {
            self.background_color
        } else {
            chart_background
        };
        contrast_text_color(backdrop)
    }
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new(LogicalPoint::new(0.0, 0.0), "")
    }
}

pub fn contrast_text_color(background: Color) -> Color {
    if background.luminance() > LUMINANCE_THRESHOLD {
        DARK_TEXT_COLOR
    } else {
        LIGHT_TEXT_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_BACKGROUND: Color = Color::rgb(0x13, 0x17, 0x22);

    #[test]
    fn black_background_without_explicit_color_gets_light_text() {
        let mut text_box = TextBox::new(LogicalPoint::new(3.0, 50.0), "note");
        text_box.background_color = Color::from_hex("#000000").unwrap();
        text_box.background_enabled = true;
        text_box.color = None;

        assert_eq!(text_box.resolved_text_color(CHART_BACKGROUND), LIGHT_TEXT_COLOR);
    }

    #[test]
    fn bright_background_gets_dark_text() {
        let mut text_box = TextBox::new(LogicalPoint::new(0.0, 0.0), "note");
        text_box.background_color = Color::rgb(0xf0, 0xe6, 0x8c);
        assert_eq!(text_box.resolved_text_color(CHART_BACKGROUND), DARK_TEXT_COLOR);
    }

    #[test]
    fn disabled_background_falls_back_to_chart_background() {
        let mut text_box = TextBox::new(LogicalPoint::new(0.0, 0.0), "note");
        text_box.background_color = Color::BLACK;
        text_box.background_enabled = false;
        assert_eq!(text_box.resolved_text_color(Color::WHITE), DARK_TEXT_COLOR);
    }

    #[test]
    fn explicit_color_wins() {
        let mut text_box = TextBox::new(LogicalPoint::new(0.0, 0.0), "note");
        text_box.color = Some(Color::rgb(0xff, 0x00, 0x00));
        assert_eq!(
            text_box.resolved_text_color(CHART_BACKGROUND),
            Color::rgb(0xff, 0x00, 0x00)
        );
    }

    #[test]
    fn mid_grey_backgrounds_split_at_threshold() {
        assert_eq!(contrast_text_color(Color::rgb(127, 127, 127)), LIGHT_TEXT_COLOR);
        assert_eq!(contrast_text_color(Color::rgb(130, 130, 130)), DARK_TEXT_COLOR);
    }

    #[test]
    fn bold_detection_accepts_keywords_and_numeric_weights() {
        let mut text_box = TextBox::default();
        assert!(!text_box.is_bold());
        text_box.font_weight = "bold".to_string();
        assert!(text_box.is_bold());
        text_box.font_weight = "700".to_string();
        assert!(text_box.is_bold());
        text_box.font_weight = "500".to_string();
        assert!(!text_box.is_bold());
    }

    #[test]
    fn background_opacity_is_clamped() {
        let mut text_box = TextBox::default();
        text_box.set_background_opacity(1.7);
        assert_eq!(text_box.background_opacity, 1.0);
        text_box.set_background_opacity(-0.2);
        assert_eq!(text_box.background_opacity, 0.0);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let text_box: TextBox = serde_json::from_str(
            r#"{ "point": { "logical": 4.0, "price": 12.0 }, "text": "hi" }"#,
        )
        .unwrap();

        assert_eq!(text_box.point, LogicalPoint::new(4.0, 12.0));
        assert_eq!(text_box.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(text_box.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(text_box.text_align, TextAlign::Left);
        assert_eq!(text_box.background_opacity, DEFAULT_BACKGROUND_OPACITY);
        assert!(text_box.background_enabled);
        assert!(text_box.text_wrap);
        assert_eq!(text_box.width, DEFAULT_WIDTH);
        assert_eq!(text_box.color, None);
    }

    #[test]
    fn missing_anchor_fails_to_deserialize() {
        let result = serde_json::from_str::<TextBox>(r#"{ "text": "hi" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn wrap_width_never_goes_negative() {
        let mut text_box = TextBox::default();
        text_box.width = 10.0;
        text_box.padding = 8.0;
        assert_eq!(text_box.wrap_width(), 0.0);
    }
}
