// MIT/Apache2 License

use crate::ClipStack;
use chalkclip_geometry::{intersect, unbounded, DeviceBox};

/// Compute the device-space bounding box of everything a clip stack lets
/// through.
///
/// This walks the whole stack once, intersecting the bounds of every entry's
/// own shape. The empty stack yields `(0, 0)..(i32::MAX, i32::MAX)`. The result
/// may be degenerate, which means nothing is visible.
pub fn get_bounds(stack: &ClipStack) -> DeviceBox {
    stack
        .iter()
        .fold(unbounded(), |acc, entry| intersect(&acc, &entry.own_bounds()))
}

impl ClipStack {
    /// See [`get_bounds`].
    #[inline]
    pub fn bounds(&self) -> DeviceBox {
        get_bounds(self)
    }
}
