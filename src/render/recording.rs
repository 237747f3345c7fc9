use super::painter::{FontSpec, Painter, Shadow};
use crate::geometry::{Color, PixelPoint, PixelRect};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    LineDash(Vec<f64>),
    Shadow(Option<Shadow>),
    Font(FontSpec),
    BeginPath,
    MoveTo(PixelPoint),
    LineTo(PixelPoint),
    RoundedRect(PixelRect, f64),
    Circle(PixelPoint, f64),
    Stroke,
    Fill,
    Text(String, f64, f64),
}

/// Records every call; text is measured as `chars * font size * 0.6`.
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub ops: Vec<Op>,
    font_size: f64,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font_size: 10.0,
        }
    }

    pub fn count(&self, matches: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Painter for RecordingPainter {
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(Op::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(Op::Rotate(radians));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(Op::Scale(sx, sy));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(Op::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(Op::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::LineWidth(width));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.ops.push(Op::LineDash(pattern.to_vec()));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.ops.push(Op::Shadow(shadow));
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font_size = font.size;
        self.ops.push(Op::Font(font.clone()));
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, point: PixelPoint) {
        self.ops.push(Op::MoveTo(point));
    }

    fn line_to(&mut self, point: PixelPoint) {
        self.ops.push(Op::LineTo(point));
    }

    fn rounded_rect(&mut self, rect: PixelRect, radius: f64) {
        self.ops.push(Op::RoundedRect(rect, radius));
    }

    fn circle(&mut self, center: PixelPoint, radius: f64) {
        self.ops.push(Op::Circle(center, radius));
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, top: f64) {
        self.ops.push(Op::Text(text.to_string(), x, top));
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }
}
