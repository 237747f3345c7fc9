use gtk4::cairo;

use super::painter::{effective_corner_radius, FontSpec, Painter, Shadow};
use crate::geometry::{Color, PixelPoint, PixelRect};

/// [`Painter`] over a cairo context, e.g. the one handed to a GTK drawing area.
///
/// Cairo has a single source pattern, so stroke and fill colors are kept here
/// and applied right before each operation.
pub struct CairoPainter<'a> {
    context: &'a cairo::Context,
    stroke: Color,
    fill: Color,
    shadow: Option<Shadow>,
    font_size: f64,
    saved: Vec<(Color, Color, Option<Shadow>, f64)>,
}

impl<'a> CairoPainter<'a> {
    pub fn new(context: &'a cairo::Context) -> Self {
        Self {
            context,
            stroke: Color::BLACK,
            fill: Color::BLACK,
            shadow: None,
            font_size: 10.0,
            saved: Vec::new(),
        }
    }

    fn set_source(&self, color: Color) {
        let (red, green, blue, alpha) = color.to_unit_rgba();
        self.context.set_source_rgba(red, green, blue, alpha);
    }
}

impl Painter for CairoPainter<'_> {
    fn save(&mut self) {
        self.context.save().ok();
        self.saved
            .push((self.stroke, self.fill, self.shadow, self.font_size));
    }

    fn restore(&mut self) {
        self.context.restore().ok();
        if let Some((stroke, fill, shadow, font_size)) = self.saved.pop() {
            self.stroke = stroke;
            self.fill = fill;
            self.shadow = shadow;
            self.font_size = font_size;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.context.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.context.rotate(radians);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.context.scale(sx, sy);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.context.set_dash(pattern, 0.0);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }

    fn set_font(&mut self, font: &FontSpec) {
        let slant = if font.italic {
            cairo::FontSlant::Italic
        } else {
            cairo::FontSlant::Normal
        };
        let weight = if font.bold {
            cairo::FontWeight::Bold
        } else {
            cairo::FontWeight::Normal
        };
        self.context.select_font_face(&font.family, slant, weight);
        self.context.set_font_size(font.size.max(1.0));
        self.font_size = font.size.max(1.0);
    }

    fn begin_path(&mut self) {
        self.context.new_path();
    }

    fn move_to(&mut self, point: PixelPoint) {
        self.context.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: PixelPoint) {
        self.context.line_to(point.x, point.y);
    }

    fn rounded_rect(&mut self, rect: PixelRect, radius: f64) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let radius = effective_corner_radius(rect, radius);
        if radius <= 0.0 {
            self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
            return;
        }

        let right = rect.right();
        let bottom = rect.bottom();
        self.context.new_sub_path();
        self.context.arc(
            right - radius,
            rect.y + radius,
            radius,
            -std::f64::consts::FRAC_PI_2,
            0.0,
        );
        self.context.arc(
            right - radius,
            bottom - radius,
            radius,
            0.0,
            std::f64::consts::FRAC_PI_2,
        );
        self.context.arc(
            rect.x + radius,
            bottom - radius,
            radius,
            std::f64::consts::FRAC_PI_2,
            std::f64::consts::PI,
        );
        self.context.arc(
            rect.x + radius,
            rect.y + radius,
            radius,
            std::f64::consts::PI,
            std::f64::consts::PI * 1.5,
        );
        self.context.close_path();
    }

    fn circle(&mut self, center: PixelPoint, radius: f64) {
        self.context.new_sub_path();
        self.context
            .arc(center.x, center.y, radius.max(0.0), 0.0, std::f64::consts::TAU);
        self.context.close_path();
    }

    fn stroke(&mut self) {
        self.set_source(self.stroke);
        let _ = self.context.stroke_preserve();
    }

    fn fill(&mut self) {
        self.set_source(self.fill);
        let _ = self.context.fill_preserve();
    }

    fn fill_text(&mut self, text: &str, x: f64, top: f64) {
        if text.is_empty() {
            return;
        }
        let ascent = self
            .context
            .font_extents()
            .map(|extents| extents.ascent())
            .unwrap_or(self.font_size * 0.8);
        let baseline = top + ascent;

        // Cairo has no shadow blur; a wide translucent stroke of the glyph
        // outlines stands in for it.
        if let Some(shadow) = self.shadow.filter(|shadow| shadow.blur > 0.0) {
            self.context.save().ok();
            self.set_source(shadow.color);
            self.context.set_line_width(shadow.blur);
            self.context.set_line_join(cairo::LineJoin::Round);
            self.context.new_path();
            self.context.move_to(x, baseline);
            self.context.text_path(text);
            let _ = self.context.stroke();
            self.context.restore().ok();
        }

        self.set_source(self.fill);
        self.context.move_to(x, baseline);
        let _ = self.context.show_text(text);
        self.context.new_path();
    }

    fn measure_text(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.context
            .text_extents(text)
            .map(|extents| extents.x_advance())
            .unwrap_or_else(|_| text.chars().count() as f64 * self.font_size * 0.6)
    }
}
