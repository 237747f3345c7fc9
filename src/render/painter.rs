use crate::geometry::{Color, PixelPoint, PixelRect};

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }
}

/// Soft halo painted behind filled text. `blur` is in current user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
}

/// Immediate-mode drawing surface the renderer paints through.
///
/// Path semantics follow an HTML canvas: `stroke` and `fill` leave the current
/// path in place, `begin_path` discards it. `fill_text` positions text by the
/// top of its line box, not its baseline.
pub trait Painter {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// An empty pattern means a solid line.
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn set_font(&mut self, font: &FontSpec);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: PixelPoint);
    fn line_to(&mut self, point: PixelPoint);
    fn rounded_rect(&mut self, rect: PixelRect, radius: f64);
    fn circle(&mut self, center: PixelPoint, radius: f64);
    fn stroke(&mut self);
    fn fill(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, top: f64);
    /// Advance width of `text` in the current font.
    fn measure_text(&self, text: &str) -> f64;
}

/// Corner radius clamped so opposite corners never overlap.
pub fn effective_corner_radius(rect: PixelRect, radius: f64) -> f64 {
    let max_radius = rect.width.min(rect.height).max(0.0) / 2.0;
    radius.clamp(0.0, max_radius)
}
