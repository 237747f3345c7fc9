use super::{default_drawing_color, Color, LogicalPoint};
use serde::{Deserialize, Serialize};

/// A dashed line across the full visible width at one price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalLine {
    pub price: f64,
    #[serde(default = "default_drawing_color")]
    pub color: Color,
}

impl HorizontalLine {
    pub const fn new(price: f64, color: Color) -> Self {
        Self { price, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub point1: LogicalPoint,
    pub point2: LogicalPoint,
    #[serde(default = "default_drawing_color")]
    pub color: Color,
}

impl TrendLine {
    pub const fn new(point1: LogicalPoint, point2: LogicalPoint, color: Color) -> Self {
        Self {
            point1,
            point2,
            color,
        }
    }

    /// A zero-length line at `start`, grown by later pointer moves.
    pub const fn starting_at(start: LogicalPoint, color: Color) -> Self {
        Self::new(start, start, color)
    }

    pub fn set_end(&mut self, end: LogicalPoint) {
        self.point2 = end;
    }
}
