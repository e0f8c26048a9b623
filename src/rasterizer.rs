// MIT/Apache2 License

use crate::{Primitive, Result, ScissorRect, TargetGeometry};
use chalkclip_geometry::{LocalRect, Transform, Viewport};

/// The comparison run by the stencil test.
///
/// The test compares `reference & mask` against `stencil & mask`, with the
/// reference on the left-hand side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StencilFunc {
    Never,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    Always,
}

impl StencilFunc {
    /// Does a fragment with the given stored stencil value pass the test?
    #[inline]
    pub fn passes(self, reference: u8, mask: u8, value: u8) -> bool {
        let (r, v) = (reference & mask, value & mask);
        match self {
            StencilFunc::Never => false,
            StencilFunc::Less => r < v,
            StencilFunc::LessEqual => r <= v,
            StencilFunc::Greater => r > v,
            StencilFunc::GreaterEqual => r >= v,
            StencilFunc::Equal => r == v,
            StencilFunc::NotEqual => r != v,
            StencilFunc::Always => true,
        }
    }
}

/// What happens to a stored stencil value when a fragment touches it.
///
/// The same operation is used whether the fragment passed or failed the
/// stencil test.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    /// Increment, saturating at the maximum value.
    Incr,
    /// Decrement, saturating at zero.
    Decr,
    Invert,
}

impl StencilOp {
    /// Apply this operation to a stored value, honoring the write mask.
    #[inline]
    pub fn apply(self, value: u8, reference: u8, write_mask: u8) -> u8 {
        let new = match self {
            StencilOp::Keep => value,
            StencilOp::Zero => 0,
            StencilOp::Replace => reference,
            StencilOp::Incr => value.saturating_add(1),
            StencilOp::Decr => value.saturating_sub(1),
            StencilOp::Invert => !value,
        };
        (value & !write_mask) | (new & write_mask)
    }
}

/// A render target, plus the draw calls needed to rasterize clip shapes into
/// it.
///
/// This is the dispatch table the clip compositor talks to. Every method maps
/// onto one piece of fixed-function rasterizer state, and is expected to take
/// effect immediately, in call order.
pub trait Rasterizer {
    /// The current viewport, in device pixels.
    fn viewport(&self) -> Viewport;

    /// A counter that changes every time the viewport does.
    fn viewport_generation(&self) -> u64;

    /// The height of the target in pixels.
    fn height(&self) -> i32;

    /// Is this an offscreen target? Offscreen targets are rendered upside
    /// down, with their origin at the top left.
    fn is_offscreen(&self) -> bool;

    /// The current modelview and projection slots.
    fn transform(&self) -> Transform;

    /// Replace the current modelview and projection slots.
    fn set_transform(&mut self, transform: Transform);

    /// Enable the scissor test with the given rectangle, or disable it.
    fn set_scissor(&mut self, scissor: Option<ScissorRect>) -> Result;

    /// Enable or disable the stencil test.
    fn set_stencil_test(&mut self, enabled: bool) -> Result;

    /// Set the stencil comparison.
    fn set_stencil_func(&mut self, func: StencilFunc, reference: u8, mask: u8) -> Result;

    /// Set the stencil update operation.
    fn set_stencil_op(&mut self, op: StencilOp) -> Result;

    /// Set which stencil bits may be written.
    fn set_stencil_write_mask(&mut self, mask: u8) -> Result;

    /// Enable or disable writes to the color and depth buffers.
    fn set_write_masks(&mut self, color: bool, depth: bool) -> Result;

    /// Set every stencil value inside the scissor rectangle (if enabled) to
    /// `value`, honoring the stencil write mask.
    fn clear_stencil(&mut self, value: u8) -> Result;

    /// Draw a rectangle under the current transform.
    fn draw_rectangle(&mut self, rect: LocalRect) -> Result;

    /// Draw a primitive under the current transform.
    fn draw_primitive(&mut self, primitive: &Primitive) -> Result;

    /// Bundle up what the scissor planner needs to know about this target.
    #[inline]
    fn geometry(&self) -> TargetGeometry {
        TargetGeometry {
            viewport: self.viewport(),
            height: self.height(),
            is_offscreen: self.is_offscreen(),
        }
    }
}

impl<R: Rasterizer + ?Sized> Rasterizer for &mut R {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }
    fn viewport_generation(&self) -> u64 {
        (**self).viewport_generation()
    }
    fn height(&self) -> i32 {
        (**self).height()
    }
    fn is_offscreen(&self) -> bool {
        (**self).is_offscreen()
    }
    fn transform(&self) -> Transform {
        (**self).transform()
    }
    fn set_transform(&mut self, transform: Transform) {
        (**self).set_transform(transform)
    }
    fn set_scissor(&mut self, scissor: Option<ScissorRect>) -> Result {
        (**self).set_scissor(scissor)
    }
    fn set_stencil_test(&mut self, enabled: bool) -> Result {
        (**self).set_stencil_test(enabled)
    }
    fn set_stencil_func(&mut self, func: StencilFunc, reference: u8, mask: u8) -> Result {
        (**self).set_stencil_func(func, reference, mask)
    }
    fn set_stencil_op(&mut self, op: StencilOp) -> Result {
        (**self).set_stencil_op(op)
    }
    fn set_stencil_write_mask(&mut self, mask: u8) -> Result {
        (**self).set_stencil_write_mask(mask)
    }
    fn set_write_masks(&mut self, color: bool, depth: bool) -> Result {
        (**self).set_write_masks(color, depth)
    }
    fn clear_stencil(&mut self, value: u8) -> Result {
        (**self).clear_stencil(value)
    }
    fn draw_rectangle(&mut self, rect: LocalRect) -> Result {
        (**self).draw_rectangle(rect)
    }
    fn draw_primitive(&mut self, primitive: &Primitive) -> Result {
        (**self).draw_primitive(primitive)
    }
}
