//! Drawing records and the closed set of shapes the engine understands.

mod freehand;
mod lines;
mod patch;
mod ruler;
mod text_box;

pub use crate::geometry::{Color, LogicalPoint};
pub use freehand::Freehand;
pub use lines::{HorizontalLine, TrendLine};
pub use patch::DrawingPatch;
pub use ruler::{Ruler, RulerMeasurement};
pub use text_box::{contrast_text_color, FontStyle, TextAlign, TextBox, TextDecoration};

use serde::{Deserialize, Serialize};

/// Color used for new drawings when neither the tool nor the record says otherwise.
pub const DEFAULT_DRAWING_COLOR: Color = Color::rgb(0x29, 0x62, 0xff);

pub(crate) fn default_drawing_color() -> Color {
    DEFAULT_DRAWING_COLOR
}

/// Opaque drawing identifier, unique within one store for the record's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(u64);

impl DrawingId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DrawingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drawing-{}", self.0)
    }
}

/// Id carried by a persisted record that is not one of ours: any JSON string,
/// or a number that is not an unsigned integer. Kept so the record is written
/// back under the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForeignId {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for ForeignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingKind {
    HorizontalLine,
    TrendLine,
    Freehand,
    Ruler,
    TextBox,
}

impl DrawingKind {
    pub const ALL: [DrawingKind; 5] = [
        Self::HorizontalLine,
        Self::TrendLine,
        Self::Freehand,
        Self::Ruler,
        Self::TextBox,
    ];

    /// Tag written to the persisted record's `type` field.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::HorizontalLine => "horizontal-line",
            Self::TrendLine => "trend-line",
            Self::Freehand => "freehand",
            Self::Ruler => "ruler",
            Self::TextBox => "text-box",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    HorizontalLine(HorizontalLine),
    TrendLine(TrendLine),
    Freehand(Freehand),
    Ruler(Ruler),
    TextBox(TextBox),
}

impl Shape {
    pub const fn kind(&self) -> DrawingKind {
        match self {
            Self::HorizontalLine(_) => DrawingKind::HorizontalLine,
            Self::TrendLine(_) => DrawingKind::TrendLine,
            Self::Freehand(_) => DrawingKind::Freehand,
            Self::Ruler(_) => DrawingKind::Ruler,
            Self::TextBox(_) => DrawingKind::TextBox,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Self::HorizontalLine(line) => Some(line.color),
            Self::TrendLine(line) => Some(line.color),
            Self::Freehand(stroke) => Some(stroke.color),
            Self::Ruler(ruler) => Some(ruler.color),
            Self::TextBox(text_box) => text_box.color,
        }
    }

    /// Rejects geometry no renderer can make sense of: non-finite coordinates,
    /// empty strokes, negative box extents.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::HorizontalLine(line) => line.price.is_finite(),
            Self::TrendLine(line) => line.point1.is_finite() && line.point2.is_finite(),
            Self::Freehand(stroke) => {
                !stroke.points.is_empty() && stroke.points.iter().all(|point| point.is_finite())
            }
            Self::Ruler(ruler) => ruler.point1.is_finite() && ruler.point2.is_finite(),
            Self::TextBox(text_box) => {
                text_box.point.is_finite()
                    && text_box.width.is_finite()
                    && text_box.height.is_finite()
                    && text_box.width >= 0.0
                    && text_box.height >= 0.0
            }
        }
    }

    pub(crate) fn as_text_box(&self) -> Option<&TextBox> {
        match self {
            Self::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }

    pub(crate) fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match self {
            Self::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }
}

impl From<HorizontalLine> for Shape {
    fn from(line: HorizontalLine) -> Self {
        Self::HorizontalLine(line)
    }
}

impl From<TrendLine> for Shape {
    fn from(line: TrendLine) -> Self {
        Self::TrendLine(line)
    }
}

impl From<Freehand> for Shape {
    fn from(stroke: Freehand) -> Self {
        Self::Freehand(stroke)
    }
}

impl From<Ruler> for Shape {
    fn from(ruler: Ruler) -> Self {
        Self::Ruler(ruler)
    }
}

impl From<TextBox> for Shape {
    fn from(text_box: TextBox) -> Self {
        Self::TextBox(text_box)
    }
}

/// A stored annotation: stable id plus its shape.
///
/// `foreign_id` is set only for records decoded with an id that does not fit
/// `DrawingId`; the codec writes it back in place of `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    #[serde(skip)]
    pub foreign_id: Option<ForeignId>,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Drawing {
    pub fn new(id: DrawingId, shape: impl Into<Shape>) -> Self {
        Self {
            id,
            foreign_id: None,
            shape: shape.into(),
        }
    }

    pub fn with_foreign_id(mut self, foreign_id: ForeignId) -> Self {
        self.foreign_id = Some(foreign_id);
        self
    }

    pub const fn kind(&self) -> DrawingKind {
        self.shape.kind()
    }

    pub fn as_text_box(&self) -> Option<&TextBox> {
        self.shape.as_text_box()
    }
}
