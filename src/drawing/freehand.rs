use super::{default_drawing_color, Color, LogicalPoint};
use serde::{Deserialize, Serialize};

/// A continuous pen stroke in chart space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub points: Vec<LogicalPoint>,
    #[serde(default = "default_drawing_color")]
    pub color: Color,
}

impl Freehand {
    pub fn new(start: LogicalPoint, color: Color) -> Self {
        Self {
            points: vec![start],
            color,
        }
    }

    pub fn append_point(&mut self, point: LogicalPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
