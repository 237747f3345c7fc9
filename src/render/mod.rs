//! Per-frame painting of the drawing list through a [`Painter`].

#[cfg(feature = "cairo")]
mod cairo_painter;
mod painter;
#[cfg(test)]
pub(crate) mod recording;
mod text_box;

#[cfg(feature = "cairo")]
pub use cairo_painter::CairoPainter;
pub use painter::{effective_corner_radius, FontSpec, Painter, Shadow};
pub use text_box::{layout_text_box, wrap_text_lines, TextLine};

use std::collections::HashSet;

use crate::coords::CoordinateMapper;
use crate::drawing::{
    contrast_text_color, Drawing, DrawingId, Freehand, HorizontalLine, Ruler, Shape, TrendLine,
    DEFAULT_DRAWING_COLOR,
};
use crate::geometry::{Color, PixelPoint, PixelRect};
use crate::hit_test::{self, TextBoxHandles, HANDLE_SIZE};

const LABEL_FONT_FAMILY: &str = "Inter";
const LABEL_FONT_SIZE: f64 = 12.0;
const LABEL_OFFSET: f64 = 8.0;
const LABEL_PADDING_X: f64 = 6.0;
const LABEL_PADDING_Y: f64 = 4.0;
const LABEL_OPACITY: f64 = 0.85;
const SELECTION_DASH: [f64; 2] = [4.0, 3.0];

/// Media size and device pixel ratios of the frame being painted.
///
/// Projections are in media pixels; the painter works in bitmap pixels, and
/// the two ratios may differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScale {
    pub media_width: f64,
    pub media_height: f64,
    pub horizontal_pixel_ratio: f64,
    pub vertical_pixel_ratio: f64,
}

impl FrameScale {
    pub fn new(media_width: f64, media_height: f64) -> Self {
        Self {
            media_width,
            media_height,
            horizontal_pixel_ratio: 1.0,
            vertical_pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(self, horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal_pixel_ratio: sanitize_ratio(horizontal),
            vertical_pixel_ratio: sanitize_ratio(vertical),
            ..self
        }
    }

    pub fn to_bitmap(&self, point: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            point.x * self.horizontal_pixel_ratio,
            point.y * self.vertical_pixel_ratio,
        )
    }

    pub fn rect_to_bitmap(&self, rect: PixelRect) -> PixelRect {
        PixelRect::new(
            rect.x * self.horizontal_pixel_ratio,
            rect.y * self.vertical_pixel_ratio,
            rect.width * self.horizontal_pixel_ratio,
            rect.height * self.vertical_pixel_ratio,
        )
    }

    pub fn bitmap_width(&self) -> f64 {
        self.media_width * self.horizontal_pixel_ratio
    }

    /// Width for strokes that are neither purely horizontal nor vertical.
    fn stroke_width(&self, media_width: f64) -> f64 {
        media_width * (self.horizontal_pixel_ratio + self.vertical_pixel_ratio) / 2.0
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Backdrop used for text color contrast when a box has no background.
    pub chart_background: Color,
    pub glow: bool,
    pub horizontal_line_dash: Vec<f64>,
    pub line_width: f64,
    pub selection_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            chart_background: Color::rgb(0x13, 0x17, 0x22),
            glow: true,
            horizontal_line_dash: vec![6.0, 4.0],
            line_width: 2.0,
            selection_color: DEFAULT_DRAWING_COLOR,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Paints `drawings` in list order, skipping ids in `suppressed` and any
    /// shape that cannot be projected this frame. Returns how many were painted.
    pub fn paint(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        drawings: &[Drawing],
        suppressed: &HashSet<DrawingId>,
    ) -> usize {
        let mut painted = 0_usize;
        for drawing in drawings {
            if suppressed.contains(&drawing.id) {
                continue;
            }
            let drawn = match &drawing.shape {
                Shape::HorizontalLine(line) => self.paint_horizontal_line(painter, mapper, frame, line),
                Shape::TrendLine(line) => self.paint_trend_line(painter, mapper, frame, line),
                Shape::Freehand(stroke) => self.paint_freehand(painter, mapper, frame, stroke),
                Shape::Ruler(ruler) => self.paint_ruler(painter, mapper, frame, ruler),
                Shape::TextBox(text_box) => match mapper.project(text_box.point) {
                    Some(anchor) => {
                        text_box::paint_text_box(painter, &self.style, frame, anchor, text_box);
                        true
                    }
                    None => false,
                },
            };
            if drawn {
                painted += 1;
            } else {
                tracing::trace!(id = %drawing.id, "drawing not projectable this frame");
            }
        }
        painted
    }

    /// Outline plus resize and rotate handles for a selected text box.
    pub fn paint_selection(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        drawing: &Drawing,
    ) -> bool {
        let Some(rect) = drawing
            .as_text_box()
            .and_then(|text_box| hit_test::text_box_rect(mapper, text_box))
        else {
            return false;
        };
        let handles = TextBoxHandles::for_rect(rect);
        let outline = frame.rect_to_bitmap(rect);
        let top_center = frame.to_bitmap(PixelPoint::new(rect.center().x, rect.y));
        let knob = frame.to_bitmap(handles.rotate);
        let line_width = frame.stroke_width(1.0);

        painter.save();
        painter.set_stroke_color(self.style.selection_color);
        painter.set_line_width(line_width);
        painter.set_line_dash(&SELECTION_DASH.map(|dash| dash * frame.horizontal_pixel_ratio));
        painter.begin_path();
        painter.rounded_rect(outline, 0.0);
        painter.stroke();

        painter.set_line_dash(&[]);
        painter.begin_path();
        painter.move_to(top_center);
        painter.line_to(knob);
        painter.stroke();

        painter.set_fill_color(Color::WHITE);
        painter.begin_path();
        painter.rounded_rect(frame.rect_to_bitmap(handles.resize), 0.0);
        painter.circle(knob, frame.stroke_width(HANDLE_SIZE / 2.0));
        painter.fill();
        painter.stroke();
        painter.restore();
        true
    }

    fn paint_horizontal_line(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        line: &HorizontalLine,
    ) -> bool {
        let Some(y) = mapper.price_to_pixel_y(line.price) else {
            return false;
        };
        let y = y * frame.vertical_pixel_ratio;
        let dash: Vec<f64> = self
            .style
            .horizontal_line_dash
            .iter()
            .map(|segment| segment * frame.horizontal_pixel_ratio)
            .collect();

        painter.set_stroke_color(line.color);
        painter.set_line_width(self.style.line_width * frame.vertical_pixel_ratio);
        painter.set_line_dash(&dash);
        painter.begin_path();
        painter.move_to(PixelPoint::new(0.0, y));
        painter.line_to(PixelPoint::new(frame.bitmap_width(), y));
        painter.stroke();
        painter.set_line_dash(&[]);
        true
    }

    fn paint_segment(
        &self,
        painter: &mut dyn Painter,
        frame: &FrameScale,
        from: PixelPoint,
        to: PixelPoint,
        color: Color,
    ) {
        painter.set_stroke_color(color);
        painter.set_line_width(frame.stroke_width(self.style.line_width));
        painter.set_line_dash(&[]);
        painter.begin_path();
        painter.move_to(frame.to_bitmap(from));
        painter.line_to(frame.to_bitmap(to));
        painter.stroke();
    }

    fn paint_trend_line(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        line: &TrendLine,
    ) -> bool {
        let (Some(from), Some(to)) = (mapper.project(line.point1), mapper.project(line.point2)) else {
            return false;
        };
        self.paint_segment(painter, frame, from, to, line.color);
        true
    }

    fn paint_freehand(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        stroke: &Freehand,
    ) -> bool {
        let projected: Vec<Option<PixelPoint>> = stroke
            .points
            .iter()
            .map(|point| mapper.project(*point).map(|pixel| frame.to_bitmap(pixel)))
            .collect();
        if projected.iter().all(Option::is_none) {
            return false;
        }

        let runs: Vec<&[Option<PixelPoint>]> = projected
            .split(Option::is_none)
            .filter(|run| !run.is_empty())
            .collect();
        let width = frame.stroke_width(self.style.line_width);

        if runs.iter().any(|run| run.len() > 1) {
            painter.set_stroke_color(stroke.color);
            painter.set_line_width(width);
            painter.set_line_dash(&[]);
            painter.begin_path();
            for run in runs.iter().filter(|run| run.len() > 1) {
                let mut points = run.iter().flatten();
                if let Some(first) = points.next() {
                    painter.move_to(*first);
                }
                for point in points {
                    painter.line_to(*point);
                }
            }
            painter.stroke();
        }

        // A lone point would stroke nothing; draw it as a round dot.
        let dots: Vec<PixelPoint> = runs
            .iter()
            .filter(|run| run.len() == 1)
            .filter_map(|run| run[0])
            .collect();
        if !dots.is_empty() {
            painter.set_fill_color(stroke.color);
            painter.begin_path();
            for dot in dots {
                painter.circle(dot, width / 2.0);
            }
            painter.fill();
        }
        true
    }

    fn paint_ruler(
        &self,
        painter: &mut dyn Painter,
        mapper: &CoordinateMapper<'_>,
        frame: &FrameScale,
        ruler: &Ruler,
    ) -> bool {
        let (Some(from), Some(to)) = (mapper.project(ruler.point1), mapper.project(ruler.point2)) else {
            return false;
        };
        self.paint_segment(painter, frame, from, to, ruler.color);

        let measurement = ruler.measurement();
        let labels = [measurement.price_label(), measurement.bars_label()];
        let anchor = frame.to_bitmap(to);
        let line_height = LABEL_FONT_SIZE * text_box::LINE_HEIGHT_FACTOR;

        painter.save();
        painter.translate(anchor.x, anchor.y);
        painter.scale(frame.horizontal_pixel_ratio, frame.vertical_pixel_ratio);
        painter.set_font(&FontSpec::new(LABEL_FONT_FAMILY, LABEL_FONT_SIZE));
        let text_width = labels
            .iter()
            .map(|label| painter.measure_text(label))
            .fold(0.0, f64::max);
        let background = PixelRect::new(
            LABEL_OFFSET,
            LABEL_OFFSET,
            text_width + 2.0 * LABEL_PADDING_X,
            labels.len() as f64 * line_height + 2.0 * LABEL_PADDING_Y,
        );
        painter.set_fill_color(ruler.color.with_opacity(LABEL_OPACITY));
        painter.begin_path();
        painter.rounded_rect(background, effective_corner_radius(background, 4.0));
        painter.fill();

        painter.set_fill_color(contrast_text_color(ruler.color));
        for (index, label) in labels.iter().enumerate() {
            painter.fill_text(
                label,
                background.x + LABEL_PADDING_X,
                background.y + LABEL_PADDING_Y + index as f64 * line_height,
            );
        }
        painter.restore();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ChartProjection, LinearProjection};
    use crate::drawing::{LogicalPoint, TextBox};
    use crate::store::DrawingStore;
    use recording::{Op, RecordingPainter};

    // One bar per pixel, one price unit per pixel, origin at the top-left.
    fn viewport() -> LinearProjection {
        LinearProjection::new(500.0, 500.0, 1.0, 500.0, 500.0, 0.0)
    }

    fn point(x: f64, y: f64) -> LogicalPoint {
        LogicalPoint::new(x, 500.0 - y)
    }

    /// Refuses every x beyond `limit`.
    struct Clipped {
        inner: LinearProjection,
        limit: f64,
    }

    impl ChartProjection for Clipped {
        fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
            self.inner.price_to_pixel_y(price)
        }

        fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
            self.inner.pixel_y_to_price(y)
        }

        fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
            if logical > self.limit {
                return None;
            }
            self.inner.logical_to_pixel_x(logical)
        }

        fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
            self.inner.pixel_x_to_logical(x)
        }
    }

    fn paint(store: &DrawingStore, projection: &dyn ChartProjection, frame: FrameScale) -> (RecordingPainter, usize) {
        let mut painter = RecordingPainter::new();
        let painted = Renderer::default().paint(
            &mut painter,
            &CoordinateMapper::new(projection),
            &frame,
            store.list(),
            &HashSet::new(),
        );
        (painter, painted)
    }

    #[test]
    fn horizontal_line_spans_bitmap_width_dashed() {
        let mut store = DrawingStore::new();
        store.add(HorizontalLine::new(400.0, DEFAULT_DRAWING_COLOR));

        let frame = FrameScale::new(500.0, 500.0).with_pixel_ratio(2.0, 1.5);
        let (painter, painted) = paint(&store, &viewport(), frame);

        assert_eq!(painted, 1);
        assert!(painter.ops.contains(&Op::LineDash(vec![12.0, 8.0])));
        assert!(painter.ops.contains(&Op::MoveTo(PixelPoint::new(0.0, 150.0))));
        assert!(painter.ops.contains(&Op::LineTo(PixelPoint::new(1000.0, 150.0))));
    }

    #[test]
    fn trend_line_scales_each_axis_by_its_own_ratio() {
        let mut store = DrawingStore::new();
        store.add(TrendLine::new(point(10.0, 20.0), point(30.0, 40.0), DEFAULT_DRAWING_COLOR));

        let frame = FrameScale::new(500.0, 500.0).with_pixel_ratio(2.0, 3.0);
        let (painter, _) = paint(&store, &viewport(), frame);

        assert!(painter.ops.contains(&Op::MoveTo(PixelPoint::new(20.0, 60.0))));
        assert!(painter.ops.contains(&Op::LineTo(PixelPoint::new(60.0, 120.0))));
    }

    #[test]
    fn line_with_unprojectable_endpoint_is_skipped_entirely() {
        let mut store = DrawingStore::new();
        store.add(TrendLine::new(point(10.0, 20.0), point(300.0, 40.0), DEFAULT_DRAWING_COLOR));
        store.add(Ruler::new(point(10.0, 20.0), point(300.0, 40.0), DEFAULT_DRAWING_COLOR));
        let clipped = Clipped {
            inner: viewport(),
            limit: 100.0,
        };

        let (painter, painted) = paint(&store, &clipped, FrameScale::new(500.0, 500.0));

        assert_eq!(painted, 0);
        assert!(painter.ops.is_empty());
    }

    #[test]
    fn freehand_breaks_into_sub_paths_at_unprojectable_points() {
        let mut store = DrawingStore::new();
        let mut stroke = Freehand::new(point(10.0, 10.0), DEFAULT_DRAWING_COLOR);
        stroke.append_point(point(20.0, 10.0));
        stroke.append_point(point(200.0, 10.0));
        stroke.append_point(point(30.0, 10.0));
        stroke.append_point(point(40.0, 10.0));
        store.add(stroke);
        let clipped = Clipped {
            inner: viewport(),
            limit: 100.0,
        };

        let (painter, painted) = paint(&store, &clipped, FrameScale::new(500.0, 500.0));

        assert_eq!(painted, 1);
        let path: Vec<&Op> = painter
            .ops
            .iter()
            .filter(|op| matches!(op, Op::MoveTo(_) | Op::LineTo(_)))
            .collect();
        assert_eq!(
            path,
            vec![
                &Op::MoveTo(PixelPoint::new(10.0, 10.0)),
                &Op::LineTo(PixelPoint::new(20.0, 10.0)),
                &Op::MoveTo(PixelPoint::new(30.0, 10.0)),
                &Op::LineTo(PixelPoint::new(40.0, 10.0)),
            ]
        );
    }

    #[test]
    fn single_point_freehand_paints_a_dot() {
        let mut store = DrawingStore::new();
        store.add(Freehand::new(point(10.0, 10.0), DEFAULT_DRAWING_COLOR));

        let (painter, painted) = paint(&store, &viewport(), FrameScale::new(500.0, 500.0));

        assert_eq!(painted, 1);
        assert!(painter.ops.contains(&Op::FillColor(DEFAULT_DRAWING_COLOR)));
        let radius = RenderStyle::default().line_width / 2.0;
        assert!(painter
            .ops
            .contains(&Op::Circle(PixelPoint::new(10.0, 10.0), radius)));
        assert!(painter.ops.contains(&Op::Fill));
        assert!(!painter.ops.contains(&Op::Stroke));
    }

    #[test]
    fn isolated_point_between_clipped_points_paints_a_dot() {
        let mut store = DrawingStore::new();
        let mut stroke = Freehand::new(point(10.0, 10.0), DEFAULT_DRAWING_COLOR);
        stroke.append_point(point(20.0, 10.0));
        stroke.append_point(point(200.0, 10.0));
        stroke.append_point(point(30.0, 10.0));
        stroke.append_point(point(200.0, 10.0));
        store.add(stroke);
        let clipped = Clipped {
            inner: viewport(),
            limit: 100.0,
        };

        let (painter, _) = paint(&store, &clipped, FrameScale::new(500.0, 500.0));

        assert!(painter.ops.contains(&Op::Stroke));
        let dots: Vec<&Op> = painter
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle(..)))
            .collect();
        assert_eq!(dots.len(), 1);
        assert!(matches!(dots[0], Op::Circle(center, _) if *center == PixelPoint::new(30.0, 10.0)));
    }

    #[test]
    fn ruler_draws_measurement_labels() {
        let mut store = DrawingStore::new();
        store.add(Ruler::new(
            LogicalPoint::new(10.0, 100.0),
            LogicalPoint::new(22.0, 150.0),
            DEFAULT_DRAWING_COLOR,
        ));

        let (painter, painted) = paint(&store, &viewport(), FrameScale::new(500.0, 500.0));

        assert_eq!(painted, 1);
        assert_eq!(painter.texts(), vec!["50.00 (50.00%)", "12 bars"]);
    }

    #[test]
    fn suppressed_ids_are_not_painted() {
        let mut store = DrawingStore::new();
        let editing = store.add(TextBox::new(point(10.0, 10.0), "live"));
        store.add(HorizontalLine::new(100.0, DEFAULT_DRAWING_COLOR));

        let mut painter = RecordingPainter::new();
        let painted = Renderer::default().paint(
            &mut painter,
            &CoordinateMapper::new(&viewport()),
            &FrameScale::new(500.0, 500.0),
            store.list(),
            &HashSet::from([editing]),
        );

        assert_eq!(painted, 1);
        assert!(painter.texts().is_empty());
    }

    #[test]
    fn unsized_host_paints_nothing() {
        let mut store = DrawingStore::new();
        store.add(HorizontalLine::new(100.0, DEFAULT_DRAWING_COLOR));
        store.add(TextBox::new(point(10.0, 10.0), "hidden"));
        let mut view = viewport();
        view.resize(0.0, 0.0);

        let (painter, painted) = paint(&store, &view, FrameScale::new(0.0, 0.0));

        assert_eq!(painted, 0);
        assert!(painter.ops.is_empty());
    }

    #[test]
    fn selection_marks_text_boxes_only() {
        let mut store = DrawingStore::new();
        let text_box = store.add(TextBox::new(point(10.0, 30.0), "note"));
        let line = store.add(HorizontalLine::new(100.0, DEFAULT_DRAWING_COLOR));
        let view = viewport();
        let mapper = CoordinateMapper::new(&view);
        let frame = FrameScale::new(500.0, 500.0);
        let renderer = Renderer::default();

        let mut painter = RecordingPainter::new();
        assert!(renderer.paint_selection(&mut painter, &mapper, &frame, store.get(text_box).unwrap()));
        assert!(painter.ops.contains(&Op::Circle(PixelPoint::new(110.0, 10.0), 5.0)));

        let mut painter = RecordingPainter::new();
        assert!(!renderer.paint_selection(&mut painter, &mapper, &frame, store.get(line).unwrap()));
        assert!(painter.ops.is_empty());
    }
}
