use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::drawing::{
    Color, DrawingKind, Freehand, HorizontalLine, LogicalPoint, Ruler, Shape, TextBox, TrendLine,
    DEFAULT_DRAWING_COLOR,
};

pub const DEFAULT_TEXT_BOX_TEXT: &str = "Text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    HorizontalLine,
    TrendLine,
    Freehand,
    Ruler,
    TextBox,
}

/// How many pointer events it takes to author a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationMode {
    /// Created and committed on pointer-down.
    OneShot,
    /// Anchored on pointer-down, second point follows the pointer until release.
    TwoPoint,
    /// Every pointer move appends a point until release.
    Continuous,
}

impl ToolKind {
    pub const fn creation_mode(self) -> CreationMode {
        match self {
            Self::HorizontalLine | Self::TextBox => CreationMode::OneShot,
            Self::TrendLine | Self::Ruler => CreationMode::TwoPoint,
            Self::Freehand => CreationMode::Continuous,
        }
    }

    pub const fn drawing_kind(self) -> DrawingKind {
        match self {
            Self::HorizontalLine => DrawingKind::HorizontalLine,
            Self::TrendLine => DrawingKind::TrendLine,
            Self::Freehand => DrawingKind::Freehand,
            Self::Ruler => DrawingKind::Ruler,
            Self::TextBox => DrawingKind::TextBox,
        }
    }
}

/// Host policy for newly authored drawings.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefaults {
    pub colors: HashMap<ToolKind, Color>,
    /// Tools that stay armed after a drawing is committed.
    pub sticky: HashSet<ToolKind>,
    /// Style template for new text boxes; its anchor is replaced on creation.
    pub text_box: TextBox,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            colors: HashMap::new(),
            sticky: HashSet::new(),
            text_box: TextBox::new(LogicalPoint::new(0.0, 0.0), DEFAULT_TEXT_BOX_TEXT),
        }
    }
}

impl ToolDefaults {
    pub fn color_for(&self, tool: ToolKind) -> Color {
        self.colors
            .get(&tool)
            .copied()
            .unwrap_or(DEFAULT_DRAWING_COLOR)
    }

    pub fn is_sticky(&self, tool: ToolKind) -> bool {
        self.sticky.contains(&tool)
    }

    /// The shape a tool creates at its first point.
    pub fn initial_shape(&self, tool: ToolKind, point: LogicalPoint) -> Shape {
        let color = self.color_for(tool);
        match tool {
            ToolKind::HorizontalLine => HorizontalLine::new(point.price, color).into(),
            ToolKind::TrendLine => TrendLine::starting_at(point, color).into(),
            ToolKind::Freehand => Freehand::new(point, color).into(),
            ToolKind::Ruler => Ruler::starting_at(point, color).into(),
            ToolKind::TextBox => TextBox::from_template(&self.text_box, point).into(),
        }
    }
}
