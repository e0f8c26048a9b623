// MIT/Apache2 License

//! Programming clip state through OpenGL.
//!
//! Only the fixed-function state is set here. Drawing is left to a
//! [`GlDraw`] implementation, since it needs the caller's vertex buffers and
//! pipeline.

mod dispatch;
mod functions;

pub use dispatch::*;
pub use functions::*;

use crate::{Primitive, Rasterizer, Result, ScissorRect, StencilDraw, StencilFunc, StencilOp};
use chalkclip_geometry::{LocalRect, Transform, Viewport};

/// The parts of a GL renderer that live outside of the clip machinery: the
/// framebuffer geometry, and a way to put triangles on it.
pub trait GlDraw {
    /// The current viewport, in device pixels.
    fn viewport(&self) -> Viewport;

    /// A counter that changes every time the viewport does.
    fn viewport_generation(&self) -> u64;

    /// The height of the framebuffer.
    fn height(&self) -> i32;

    /// Is the bound framebuffer offscreen?
    fn is_offscreen(&self) -> bool;

    /// Draw a rectangle under the given transform.
    fn draw_rectangle(&mut self, rect: LocalRect, transform: &Transform) -> Result;

    /// Draw a primitive under the given transform.
    fn draw_primitive(&mut self, primitive: &Primitive, transform: &Transform) -> Result;
}

/// A `Rasterizer` that programs GL state directly.
pub struct GlRasterizer<D> {
    functions: GlFunctions,
    draw: D,
    transform: Transform,
}

impl<D: GlDraw> GlRasterizer<D> {
    /// Load the GL functions through `dispatch` and wrap `draw`.
    pub fn new<G: GlDispatch + ?Sized>(dispatch: &mut G, draw: D) -> Result<Self> {
        Ok(Self::from_functions(dispatch.functions()?, draw))
    }

    /// Wrap `draw`, using functions that were already loaded.
    #[inline]
    pub fn from_functions(functions: GlFunctions, draw: D) -> Self {
        GlRasterizer {
            functions,
            draw,
            transform: Transform::default(),
        }
    }

    #[inline]
    pub fn functions(&self) -> &GlFunctions {
        &self.functions
    }

    #[inline]
    pub fn draw(&self) -> &D {
        &self.draw
    }

    #[inline]
    pub fn draw_mut(&mut self) -> &mut D {
        &mut self.draw
    }

    #[inline]
    pub fn into_inner(self) -> D {
        self.draw
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        // SAFETY: functions were loaded from the current context
        unsafe {
            if enabled {
                (self.functions.Enable)(cap)
            } else {
                (self.functions.Disable)(cap)
            }
        }
    }
}

#[inline]
fn gl_bool(b: bool) -> GLboolean {
    if b {
        GL_TRUE
    } else {
        GL_FALSE
    }
}

#[inline]
fn gl_func(func: StencilFunc) -> GLenum {
    match func {
        StencilFunc::Never => GL_NEVER,
        StencilFunc::Less => GL_LESS,
        StencilFunc::LessEqual => GL_LEQUAL,
        StencilFunc::Greater => GL_GREATER,
        StencilFunc::GreaterEqual => GL_GEQUAL,
        StencilFunc::Equal => GL_EQUAL,
        StencilFunc::NotEqual => GL_NOTEQUAL,
        StencilFunc::Always => GL_ALWAYS,
    }
}

#[inline]
fn gl_op(op: StencilOp) -> GLenum {
    match op {
        StencilOp::Keep => GL_KEEP,
        StencilOp::Zero => GL_ZERO,
        StencilOp::Replace => GL_REPLACE,
        StencilOp::Incr => GL_INCR,
        StencilOp::Decr => GL_DECR,
        StencilOp::Invert => GL_INVERT,
    }
}

impl<D: GlDraw> Rasterizer for GlRasterizer<D> {
    fn viewport(&self) -> Viewport {
        self.draw.viewport()
    }

    fn viewport_generation(&self) -> u64 {
        self.draw.viewport_generation()
    }

    fn height(&self) -> i32 {
        self.draw.height()
    }

    fn is_offscreen(&self) -> bool {
        self.draw.is_offscreen()
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_scissor(&mut self, scissor: Option<ScissorRect>) -> Result {
        match scissor {
            Some(ScissorRect {
                x,
                y,
                width,
                height,
            }) => {
                self.set_capability(GL_SCISSOR_TEST, true);
                // SAFETY: functions were loaded from the current context
                unsafe { (self.functions.Scissor)(x, y, width, height) };
            }
            None => self.set_capability(GL_SCISSOR_TEST, false),
        }
        Ok(())
    }

    fn set_stencil_test(&mut self, enabled: bool) -> Result {
        self.set_capability(GL_STENCIL_TEST, enabled);
        Ok(())
    }

    fn set_stencil_func(&mut self, func: StencilFunc, reference: u8, mask: u8) -> Result {
        // SAFETY: functions were loaded from the current context
        unsafe { (self.functions.StencilFunc)(gl_func(func), reference.into(), mask.into()) };
        Ok(())
    }

    fn set_stencil_op(&mut self, op: StencilOp) -> Result {
        let op = gl_op(op);
        // SAFETY: functions were loaded from the current context
        unsafe { (self.functions.StencilOp)(op, op, op) };
        Ok(())
    }

    fn set_stencil_write_mask(&mut self, mask: u8) -> Result {
        // SAFETY: functions were loaded from the current context
        unsafe { (self.functions.StencilMask)(mask.into()) };
        Ok(())
    }

    fn set_write_masks(&mut self, color: bool, depth: bool) -> Result {
        let color = gl_bool(color);
        // SAFETY: functions were loaded from the current context
        unsafe {
            (self.functions.ColorMask)(color, color, color, color);
            (self.functions.DepthMask)(gl_bool(depth));
        }
        Ok(())
    }

    fn clear_stencil(&mut self, value: u8) -> Result {
        // SAFETY: functions were loaded from the current context
        unsafe {
            (self.functions.ClearStencil)(value.into());
            (self.functions.Clear)(GL_STENCIL_BUFFER_BIT);
        }
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: LocalRect) -> Result {
        self.draw.draw_rectangle(rect, &self.transform)
    }

    fn draw_primitive(&mut self, primitive: &Primitive) -> Result {
        self.draw.draw_primitive(primitive, &self.transform)
    }
}

impl<D: GlDraw> StencilDraw for GlRasterizer<D> {}
