use super::{default_drawing_color, Color, LogicalPoint};
use serde::{Deserialize, Serialize};

/// A measurement between two chart points. Its labels are derived on every
/// paint and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    pub point1: LogicalPoint,
    pub point2: LogicalPoint,
    #[serde(default = "default_drawing_color")]
    pub color: Color,
}

impl Ruler {
    pub const fn new(point1: LogicalPoint, point2: LogicalPoint, color: Color) -> Self {
        Self {
            point1,
            point2,
            color,
        }
    }

    pub const fn starting_at(start: LogicalPoint, color: Color) -> Self {
        Self::new(start, start, color)
    }

    pub fn set_end(&mut self, end: LogicalPoint) {
        self.point2 = end;
    }

    pub fn measurement(&self) -> RulerMeasurement {
        RulerMeasurement::between(self.point1, self.point2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerMeasurement {
    pub price_delta: f64,
    /// Relative to the lower of the two prices; `None` when that price is not positive.
    pub percent_delta: Option<f64>,
    pub bar_distance: u64,
}

impl RulerMeasurement {
    /// Order-independent: swapping the endpoints yields the same measurement.
    pub fn between(a: LogicalPoint, b: LogicalPoint) -> Self {
        let price_delta = (a.price - b.price).abs();
        let base = a.price.min(b.price);
        let percent_delta = (base > 0.0).then(|| price_delta / base * 100.0);
        let bars = (a.logical - b.logical).abs().round();
        let bar_distance = if bars.is_finite() { bars as u64 } else { 0 };

        Self {
            price_delta,
            percent_delta,
            bar_distance,
        }
    }

    pub fn price_label(&self) -> String {
        match self.percent_delta {
            Some(percent) => format!("{:.2} ({:.2}%)", self.price_delta, percent),
            None => format!("{:.2}", self.price_delta),
        }
    }

    pub fn bars_label(&self) -> String {
        if self.bar_distance == 1 {
            "1 bar".to_string()
        } else {
            format!("{} bars", self.bar_distance)
        }
    }
}
