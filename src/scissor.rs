// MIT/Apache2 License

use chalkclip_geometry::{intersect, is_degenerate, DeviceBox, Viewport};

/// A scissor rectangle in the rasterizer's window coordinates.
///
/// For onscreen targets the origin is the bottom left corner of the target.
/// Offscreen targets are rendered upside down, so for them the origin is the
/// top left, same as device space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The parts of a render target the scissor planner needs to know about.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetGeometry {
    pub viewport: Viewport,
    pub height: i32,
    pub is_offscreen: bool,
}

/// The scissor state a set of clip bounds calls for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScissorPlan {
    /// The rectangle to program into the scissor test.
    pub rect: ScissorRect,
    /// The bounds the rectangle was computed from, in device space. These
    /// may have been narrowed to the viewport.
    pub bounds: DeviceBox,
    empty: bool,
}

impl ScissorPlan {
    /// Does this plan let nothing through? When it doesn't, there is no point
    /// in rasterizing any stencil shapes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

/// Turn device-space clip bounds into a scissor rectangle.
///
/// If `viewport_workaround` is set, the bounds are also intersected with the
/// target's viewport.
pub fn plan_scissor(bounds: DeviceBox, target: &TargetGeometry, viewport_workaround: bool) -> ScissorPlan {
    let bounds = if viewport_workaround {
        intersect(&bounds, &target.viewport.device_box())
    } else {
        bounds
    };

    if is_degenerate(&bounds) {
        return ScissorPlan {
            rect: ScissorRect::default(),
            bounds,
            empty: true,
        };
    }

    let y = if target.is_offscreen {
        bounds.min.y
    } else {
        target.height.saturating_sub(bounds.max.y)
    };

    ScissorPlan {
        rect: ScissorRect {
            x: bounds.min.x,
            y,
            width: bounds.max.x.saturating_sub(bounds.min.x),
            height: bounds.max.y.saturating_sub(bounds.min.y),
        },
        bounds,
        empty: false,
    }
}
