use super::ChartProjection;

const MIN_BAR_SPACING: f64 = 0.5;
const MAX_BAR_SPACING: f64 = 100.0;

/// A plain bar-spacing / price-range viewport.
///
/// `right_logical` is the logical index sitting on the right edge; indices
/// further left than the visible window project to negative x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearProjection {
    pub width: f64,
    pub height: f64,
    pub bar_spacing: f64,
    pub right_logical: f64,
    pub price_top: f64,
    pub price_bottom: f64,
}

impl LinearProjection {
    pub fn new(
        width: f64,
        height: f64,
        bar_spacing: f64,
        right_logical: f64,
        price_top: f64,
        price_bottom: f64,
    ) -> Self {
        Self {
            width,
            height,
            bar_spacing: clamp_spacing(bar_spacing),
            right_logical,
            price_top,
            price_bottom,
        }
    }

    fn is_sized(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    fn price_range(&self) -> Option<f64> {
        let range = self.price_top - self.price_bottom;
        (range.is_finite() && range.abs() > f64::EPSILON).then_some(range)
    }

    /// Positive `bars` scrolls toward newer data.
    pub fn pan_bars(&mut self, bars: f64) {
        if bars.is_finite() {
            self.right_logical += bars;
        }
    }

    pub fn pan_price(&mut self, delta: f64) {
        if delta.is_finite() {
            self.price_top += delta;
            self.price_bottom += delta;
        }
    }

    /// Scales bar spacing by `factor`, keeping the bar under `anchor_x` fixed.
    pub fn zoom(&mut self, factor: f64, anchor_x: f64) {
        if !factor.is_finite() || factor <= 0.0 || !anchor_x.is_finite() {
            return;
        }
        let bars_right_of_anchor = (self.width - anchor_x) / self.bar_spacing;
        let anchored_logical = self.right_logical - bars_right_of_anchor;
        self.bar_spacing = clamp_spacing(self.bar_spacing * factor);
        self.right_logical = anchored_logical + (self.width - anchor_x) / self.bar_spacing;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }
}

fn clamp_spacing(spacing: f64) -> f64 {
    if spacing.is_finite() {
        spacing.clamp(MIN_BAR_SPACING, MAX_BAR_SPACING)
    } else {
        MIN_BAR_SPACING
    }
}

impl ChartProjection for LinearProjection {
    fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
        if !self.is_sized() {
            return None;
        }
        let range = self.price_range()?;
        Some((self.price_top - price) / range * self.height)
    }

    fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
        if !self.is_sized() {
            return None;
        }
        let range = self.price_range()?;
        Some(self.price_top - y / self.height * range)
    }

    fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
        if !self.is_sized() {
            return None;
        }
        Some(self.width - (self.right_logical - logical) * self.bar_spacing)
    }

    fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
        if !self.is_sized() {
            return None;
        }
        Some(self.right_logical - (self.width - x) / self.bar_spacing)
    }
}
