//! Projection between chart space (logical index, price) and media pixels.
//!
//! Geometry is always stored in chart space. Pixel positions are derived on
//! demand through a [`CoordinateMapper`] built fresh for each frame, because
//! pan and zoom change the mapping continuously.

mod linear;

pub use linear::LinearProjection;

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{LogicalPoint, PixelPoint};

/// Projection supplied by the host chart. `None` means the coordinate cannot
/// be resolved right now (for example the chart has not been sized yet).
pub trait ChartProjection {
    fn price_to_pixel_y(&self, price: f64) -> Option<f64>;
    fn pixel_y_to_price(&self, y: f64) -> Option<f64>;
    fn logical_to_pixel_x(&self, logical: f64) -> Option<f64>;
    fn pixel_x_to_logical(&self, x: f64) -> Option<f64>;
}

impl<P: ChartProjection + ?Sized> ChartProjection for &P {
    fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
        (**self).price_to_pixel_y(price)
    }

    fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
        (**self).pixel_y_to_price(y)
    }

    fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
        (**self).logical_to_pixel_x(logical)
    }

    fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
        (**self).pixel_x_to_logical(x)
    }
}

impl<P: ChartProjection + ?Sized> ChartProjection for Rc<P> {
    fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
        (**self).price_to_pixel_y(price)
    }

    fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
        (**self).pixel_y_to_price(y)
    }

    fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
        (**self).logical_to_pixel_x(logical)
    }

    fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
        (**self).pixel_x_to_logical(x)
    }
}

/// Lets a host keep mutating its viewport after handing it to the plugin.
impl<P: ChartProjection> ChartProjection for RefCell<P> {
    fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
        self.try_borrow().ok()?.price_to_pixel_y(price)
    }

    fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
        self.try_borrow().ok()?.pixel_y_to_price(y)
    }

    fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
        self.try_borrow().ok()?.logical_to_pixel_x(logical)
    }

    fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
        self.try_borrow().ok()?.pixel_x_to_logical(x)
    }
}

/// Stateless delegation to the host projection, plus point-level helpers.
#[derive(Clone, Copy)]
pub struct CoordinateMapper<'a> {
    projection: &'a dyn ChartProjection,
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(projection: &'a dyn ChartProjection) -> Self {
        Self { projection }
    }

    pub fn price_to_pixel_y(&self, price: f64) -> Option<f64> {
        finite(self.projection.price_to_pixel_y(price)?)
    }

    pub fn pixel_y_to_price(&self, y: f64) -> Option<f64> {
        finite(self.projection.pixel_y_to_price(y)?)
    }

    pub fn logical_to_pixel_x(&self, logical: f64) -> Option<f64> {
        finite(self.projection.logical_to_pixel_x(logical)?)
    }

    pub fn pixel_x_to_logical(&self, x: f64) -> Option<f64> {
        finite(self.projection.pixel_x_to_logical(x)?)
    }

    pub fn project(&self, point: LogicalPoint) -> Option<PixelPoint> {
        Some(PixelPoint::new(
            self.logical_to_pixel_x(point.logical)?,
            self.price_to_pixel_y(point.price)?,
        ))
    }

    pub fn unproject(&self, pixel: PixelPoint) -> Option<LogicalPoint> {
        if !pixel.x.is_finite() || !pixel.y.is_finite() {
            return None;
        }
        Some(LogicalPoint::new(
            self.pixel_x_to_logical(pixel.x)?,
            self.pixel_y_to_price(pixel.y)?,
        ))
    }
}

impl std::fmt::Debug for CoordinateMapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateMapper").finish_non_exhaustive()
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
