// MIT/Apache2 License

use crate::{Primitive, Rasterizer, Result, ScissorRect, StencilDraw, StencilFunc, StencilOp};
use chalkclip_geometry::{LocalRect, Transform, Viewport};

/// A `Rasterizer` that accepts every call and draws nothing.
///
/// It only keeps track of the target geometry and the transform slots, which
/// is enough to drive the clip machinery without a real target.
#[derive(Debug, Clone, PartialEq)]
pub struct NoopRasterizer {
    viewport: Viewport,
    generation: u64,
    height: i32,
    offscreen: bool,
    transform: Transform,
}

impl NoopRasterizer {
    /// Create a new stub target.
    #[inline]
    pub fn new(viewport: Viewport, height: i32, offscreen: bool) -> Self {
        NoopRasterizer {
            viewport,
            generation: 0,
            height,
            offscreen,
            transform: Transform::default(),
        }
    }

    /// Change the viewport.
    #[inline]
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Rasterizer for NoopRasterizer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn viewport_generation(&self) -> u64 {
        self.generation
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_offscreen(&self) -> bool {
        self.offscreen
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_scissor(&mut self, _: Option<ScissorRect>) -> Result {
        Ok(())
    }

    fn set_stencil_test(&mut self, _: bool) -> Result {
        Ok(())
    }

    fn set_stencil_func(&mut self, _: StencilFunc, _: u8, _: u8) -> Result {
        Ok(())
    }

    fn set_stencil_op(&mut self, _: StencilOp) -> Result {
        Ok(())
    }

    fn set_stencil_write_mask(&mut self, _: u8) -> Result {
        Ok(())
    }

    fn set_write_masks(&mut self, _: bool, _: bool) -> Result {
        Ok(())
    }

    fn clear_stencil(&mut self, _: u8) -> Result {
        Ok(())
    }

    fn draw_rectangle(&mut self, _: LocalRect) -> Result {
        Ok(())
    }

    fn draw_primitive(&mut self, _: &Primitive) -> Result {
        Ok(())
    }
}

impl StencilDraw for NoopRasterizer {}
