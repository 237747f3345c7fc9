use super::painter::{effective_corner_radius, FontSpec, Painter, Shadow};
use super::{FrameScale, RenderStyle};
use crate::drawing::{TextAlign, TextBox};
use crate::geometry::{PixelPoint, PixelRect};

pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
const CORNER_RADIUS: f64 = 4.0;
const OUTER_GLOW_BLUR: f64 = 8.0;
const INNER_GLOW_BLUR: f64 = 3.0;
const OUTER_GLOW_OPACITY: f64 = 0.35;
const INNER_GLOW_OPACITY: f64 = 0.6;
const UNDERLINE_GAP: f64 = 2.0;

/// One laid-out line, positioned relative to the box's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub top: f64,
    pub width: f64,
}

/// Splits `text` into display lines. With a wrap width, words are packed
/// greedily and any word wider than the limit is broken by character.
pub fn wrap_text_lines(
    text: &str,
    wrap_width: Option<f64>,
    measure: impl Fn(&str) -> f64,
) -> Vec<String> {
    let raw_lines = text.split('\n').map(|line| line.trim_end_matches('\r'));
    let Some(max_width) = wrap_width else {
        return raw_lines.map(str::to_string).collect();
    };

    let mut out = Vec::new();
    for raw_line in raw_lines {
        let mut current = String::new();
        let mut has_words = false;
        for word in raw_line.split_whitespace() {
            has_words = true;
            if !current.is_empty() {
                let candidate = format!("{current} {word}");
                if measure(&candidate) <= max_width {
                    current = candidate;
                    continue;
                }
                out.push(std::mem::take(&mut current));
            }
            if measure(word) <= max_width {
                current.push_str(word);
            } else {
                let mut chunks = break_long_word(word, max_width, &measure);
                if let Some(last) = chunks.pop() {
                    out.extend(chunks);
                    current = last;
                }
            }
        }
        if !has_words || !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn break_long_word(word: &str, max_width: f64, measure: &impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if !current.is_empty() && measure(&candidate) > max_width {
            lines.push(current);
            current = ch.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn font_for(text_box: &TextBox) -> FontSpec {
    FontSpec {
        family: text_box.font_family.clone(),
        size: text_box.font_size,
        bold: text_box.is_bold(),
        italic: text_box.font_style == crate::drawing::FontStyle::Italic,
    }
}

/// Lays out the box's text with the painter's current font.
pub fn layout_text_box(painter: &dyn Painter, text_box: &TextBox) -> Vec<TextLine> {
    let wrap_width = text_box.text_wrap.then(|| text_box.wrap_width());
    let line_height = text_box.font_size * LINE_HEIGHT_FACTOR;
    let content_width = text_box.wrap_width();

    wrap_text_lines(&text_box.text, wrap_width, |line| painter.measure_text(line))
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let width = painter.measure_text(&text);
            let offset = match text_box.text_align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (content_width - width) / 2.0,
                TextAlign::Right => content_width - width,
            };
            TextLine {
                text,
                x: text_box.padding + offset,
                top: text_box.padding + index as f64 * line_height,
                width,
            }
        })
        .collect()
}

/// Paints a text box whose top-left corner projects to `anchor` (media pixels).
///
/// The box is drawn in media units under a translate/scale transform so the
/// rotation happens around its own center.
pub(super) fn paint_text_box(
    painter: &mut dyn Painter,
    style: &RenderStyle,
    frame: &FrameScale,
    anchor: PixelPoint,
    text_box: &TextBox,
) {
    let width = text_box.width;
    let height = text_box.height;
    let center = PixelRect::new(anchor.x, anchor.y, width, height).center();
    let bitmap_center = frame.to_bitmap(center);
    let local = PixelRect::new(-width / 2.0, -height / 2.0, width, height);
    let radius = effective_corner_radius(local, CORNER_RADIUS);

    painter.save();
    painter.translate(bitmap_center.x, bitmap_center.y);
    painter.scale(frame.horizontal_pixel_ratio, frame.vertical_pixel_ratio);
    if text_box.rotation != 0.0 {
        painter.rotate(text_box.rotation.to_radians());
    }

    if text_box.background_enabled {
        painter.set_fill_color(
            text_box
                .background_color
                .with_opacity(text_box.background_opacity),
        );
        painter.begin_path();
        painter.rounded_rect(local, radius);
        painter.fill();
    }

    if text_box.border_enabled && text_box.border_width > 0.0 {
        painter.set_stroke_color(text_box.border_color);
        painter.set_line_width(text_box.border_width);
        painter.set_line_dash(&[]);
        painter.begin_path();
        painter.rounded_rect(local, radius);
        painter.stroke();
    }

    painter.set_font(&font_for(text_box));
    let lines = layout_text_box(painter, text_box);
    let text_color = text_box.resolved_text_color(style.chart_background);

    let passes = if style.glow {
        vec![
            Some(Shadow {
                color: text_color.with_opacity(OUTER_GLOW_OPACITY),
                blur: OUTER_GLOW_BLUR,
            }),
            Some(Shadow {
                color: text_color.with_opacity(INNER_GLOW_OPACITY),
                blur: INNER_GLOW_BLUR,
            }),
            None,
        ]
    } else {
        vec![None]
    };

    painter.set_fill_color(text_color);
    for shadow in passes {
        painter.set_shadow(shadow);
        for line in lines.iter().filter(|line| !line.text.is_empty()) {
            painter.fill_text(&line.text, local.x + line.x, local.y + line.top);
        }
    }
    painter.set_shadow(None);

    if text_box.is_underlined() {
        painter.set_stroke_color(text_color);
        painter.set_line_width((text_box.font_size / 14.0).max(1.0));
        painter.set_line_dash(&[]);
        for line in lines.iter().filter(|line| line.width > 0.0) {
            let y = local.y + line.top + text_box.font_size + UNDERLINE_GAP;
            painter.begin_path();
            painter.move_to(PixelPoint::new(local.x + line.x, y));
            painter.line_to(PixelPoint::new(local.x + line.x + line.width, y));
            painter.stroke();
        }
    }

    painter.restore();
}
