// BSL 1.0 License

use super::{Box2D, Point2D};
use crate::util::{ceil_i32, floor_i32};
use euclid::point2;

/// A box in device space, in whole pixels.
///
/// The box may be degenerate (`min >= max` on either axis), in which case it
/// covers nothing.
pub type DeviceBox = Box2D<i32>;

/// A rectangle in some local coordinate space.
pub type LocalRect = Box2D<f32>;

/// The box that every clip region starts out as, before any shape has been
/// intersected into it.
#[must_use]
pub fn unbounded() -> DeviceBox {
    Box2D::new(point2(0, 0), point2(i32::MAX, i32::MAX))
}

/// Intersect two device boxes.
///
/// Unlike `Box2D::intersection`, disjoint boxes produce a degenerate box
/// rather than `None`, so the result can keep being intersected.
#[must_use]
pub fn intersect(a: &DeviceBox, b: &DeviceBox) -> DeviceBox {
    a.intersection_unchecked(b)
}

/// Does this box cover no pixels at all?
#[must_use]
pub fn is_degenerate(b: &DeviceBox) -> bool {
    b.min.x >= b.max.x || b.min.y >= b.max.y
}

/// The smallest device box containing every one of the given points.
///
/// Minimums are floored and maximums are ceiled, so the box always covers
/// every pixel the points touch. An empty iterator produces a zero box.
pub fn round_out<I: IntoIterator<Item = Point2D<f32>>>(points: I) -> DeviceBox {
    let mut iter = points.into_iter();
    let first = match iter.next() {
        Some(first) => first,
        None => return Box2D::zero(),
    };

    let (min, max) = iter.fold((first, first), |(min, max), pt| {
        (
            point2(min.x.min(pt.x), min.y.min(pt.y)),
            point2(max.x.max(pt.x), max.y.max(pt.y)),
        )
    });

    Box2D::new(
        point2(floor_i32(snap(min.x)), floor_i32(snap(min.y))),
        point2(ceil_i32(snap(max.x)), ceil_i32(snap(max.y))),
    )
}

/// Coordinates this close to a pixel edge are treated as lying on it, so
/// matrix round-off doesn't grow a box by a whole pixel.
const SNAP_EPSILON: f32 = 1.0 / 1024.0;

fn snap(v: f32) -> f32 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPSILON {
        r
    } else {
        v
    }
}
