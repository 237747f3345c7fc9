use crate::coords::CoordinateMapper;
use crate::drawing::{DrawingId, LogicalPoint, TextBox};
use crate::geometry::PixelPoint;
use crate::hit_test::{self, TextBoxRegion};

use super::tool::ToolKind;

/// Smallest width or height a text box can be resized to, in pixels.
pub const MIN_TEXT_BOX_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationMode {
    Drag,
    Resize,
    Rotate,
}

impl From<TextBoxRegion> for ManipulationMode {
    fn from(region: TextBoxRegion) -> Self {
        match region {
            TextBoxRegion::Body => Self::Drag,
            TextBoxRegion::ResizeHandle => Self::Resize,
            TextBoxRegion::RotateHandle => Self::Rotate,
        }
    }
}

/// Geometry a manipulation can change, captured so cancel can put it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BoxGeometry {
    point: LogicalPoint,
    width: f64,
    height: f64,
    rotation: f64,
}

impl BoxGeometry {
    pub(super) fn capture(text_box: &TextBox) -> Self {
        Self {
            point: text_box.point,
            width: text_box.width,
            height: text_box.height,
            rotation: text_box.rotation,
        }
    }

    pub(super) fn restore(self, text_box: &mut TextBox) {
        text_box.point = self.point;
        text_box.width = self.width;
        text_box.height = self.height;
        text_box.rotation = self.rotation;
    }
}

/// An in-flight drag, resize or rotate of one text box.
#[derive(Debug, Clone, PartialEq)]
pub struct Manipulation {
    pub id: DrawingId,
    pub mode: ManipulationMode,
    /// Tool to re-arm once the manipulation ends.
    pub(super) resume: Option<ToolKind>,
    pub(super) original: BoxGeometry,
    /// Pointer position relative to the box's top-left corner at grab time.
    pub(super) grab_offset: PixelPoint,
}

impl Manipulation {
    /// Moves `text_box` toward `pointer`. Returns false when the new position
    /// cannot be resolved this frame.
    pub(super) fn apply(
        &self,
        mapper: &CoordinateMapper<'_>,
        text_box: &mut TextBox,
        pointer: PixelPoint,
    ) -> bool {
        match self.mode {
            ManipulationMode::Drag => {
                let corner = PixelPoint::new(
                    pointer.x - self.grab_offset.x,
                    pointer.y - self.grab_offset.y,
                );
                match mapper.unproject(corner) {
                    Some(point) => {
                        text_box.point = point;
                        true
                    }
                    None => false,
                }
            }
            ManipulationMode::Resize => {
                let Some(rect) = hit_test::text_box_rect(mapper, text_box) else {
                    return false;
                };
                text_box.width = (pointer.x - rect.x).max(MIN_TEXT_BOX_SIZE);
                text_box.height = (pointer.y - rect.y).max(MIN_TEXT_BOX_SIZE);
                true
            }
            ManipulationMode::Rotate => {
                let Some(rect) = hit_test::text_box_rect(mapper, text_box) else {
                    return false;
                };
                let center = rect.center();
                text_box.rotation = rotation_towards(center, pointer);
                true
            }
        }
    }
}

/// Whole degrees in `[0, 360)`, with 0 meaning the pointer is straight above `center`.
pub fn rotation_towards(center: PixelPoint, pointer: PixelPoint) -> f64 {
    let radians = (pointer.y - center.y).atan2(pointer.x - center.x);
    (radians.to_degrees() + 90.0).round().rem_euclid(360.0) + 0.0
}
