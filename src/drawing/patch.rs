use super::{Color, FontStyle, LogicalPoint, Shape, TextAlign, TextBox, TextDecoration};
use serde::Deserialize;

/// Partial update for a drawing. Fields that do not apply to the target
/// variant are ignored, so one patch type serves every shape.
///
/// Deserializes from a partial camelCase object, the same field names the
/// persisted records use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingPatch {
    pub color: Option<Color>,
    pub price: Option<f64>,
    pub point1: Option<LogicalPoint>,
    pub point2: Option<LogicalPoint>,
    pub point: Option<LogicalPoint>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<Color>,
    pub background_opacity: Option<f64>,
    pub background_enabled: Option<bool>,
    pub border_enabled: Option<bool>,
    pub border_color: Option<Color>,
    pub border_width: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub text_wrap: Option<bool>,
    pub padding: Option<f64>,
}

impl DrawingPatch {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Applies every relevant field. Returns whether anything was written.
    pub fn apply(&self, shape: &mut Shape) -> bool {
        match shape {
            Shape::HorizontalLine(line) => {
                let mut changed = assign(&mut line.color, self.color);
                changed |= assign(&mut line.price, self.price.filter(|p| p.is_finite()));
                changed
            }
            Shape::TrendLine(line) => {
                let mut changed = assign(&mut line.color, self.color);
                changed |= assign(&mut line.point1, self.point1.filter(|p| p.is_finite()));
                changed |= assign(&mut line.point2, self.point2.filter(|p| p.is_finite()));
                changed
            }
            Shape::Ruler(ruler) => {
                let mut changed = assign(&mut ruler.color, self.color);
                changed |= assign(&mut ruler.point1, self.point1.filter(|p| p.is_finite()));
                changed |= assign(&mut ruler.point2, self.point2.filter(|p| p.is_finite()));
                changed
            }
            Shape::Freehand(stroke) => assign(&mut stroke.color, self.color),
            Shape::TextBox(text_box) => self.apply_to_text_box(text_box),
        }
    }

    pub fn apply_to_text_box(&self, text_box: &mut TextBox) -> bool {
        let mut changed = false;
        if let Some(color) = self.color {
            changed |= text_box.color != Some(color);
            text_box.color = Some(color);
        }
        changed |= assign(&mut text_box.point, self.point.filter(|p| p.is_finite()));
        changed |= assign(&mut text_box.text, self.text.clone());
        changed |= assign(&mut text_box.font_size, positive(self.font_size));
        changed |= assign(&mut text_box.font_family, self.font_family.clone());
        changed |= assign(&mut text_box.font_weight, self.font_weight.clone());
        changed |= assign(&mut text_box.font_style, self.font_style);
        changed |= assign(&mut text_box.text_decoration, self.text_decoration);
        changed |= assign(&mut text_box.text_align, self.text_align);
        changed |= assign(&mut text_box.background_color, self.background_color);
        if let Some(opacity) = self.background_opacity {
            let before = text_box.background_opacity;
            text_box.set_background_opacity(opacity);
            changed |= before != text_box.background_opacity;
        }
        changed |= assign(&mut text_box.background_enabled, self.background_enabled);
        changed |= assign(&mut text_box.border_enabled, self.border_enabled);
        changed |= assign(&mut text_box.border_color, self.border_color);
        changed |= assign(&mut text_box.border_width, non_negative(self.border_width));
        changed |= assign(&mut text_box.width, non_negative(self.width));
        changed |= assign(&mut text_box.height, non_negative(self.height));
        changed |= assign(&mut text_box.rotation, self.rotation.filter(|r| r.is_finite()));
        changed |= assign(&mut text_box.text_wrap, self.text_wrap);
        changed |= assign(&mut text_box.padding, non_negative(self.padding));
        changed
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}
