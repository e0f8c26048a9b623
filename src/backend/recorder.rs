// MIT/Apache2 License

use crate::{Primitive, Rasterizer, Result, ScissorRect, StencilDraw, StencilFunc, StencilOp};
use chalkclip_geometry::{LocalRect, Transform, Viewport};

/// A call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTransform(Transform),
    Scissor(Option<ScissorRect>),
    StencilTest(bool),
    StencilFunc(StencilFunc, u8, u8),
    StencilOp(StencilOp),
    StencilWriteMask(u8),
    WriteMasks { color: bool, depth: bool },
    ClearStencil(u8),
    DrawRectangle(LocalRect),
    DrawPrimitive,
}

impl Command {
    /// Does this command rasterize anything?
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(self, Command::DrawRectangle(_) | Command::DrawPrimitive)
    }
}

/// Wraps a `Rasterizer` and keeps a log of every call made on it.
///
/// The stencil operations are always broken down into their `Rasterizer`
/// calls, even if the wrapped target has faster versions, so that the log is
/// complete.
#[derive(Debug, Clone)]
pub struct Recorder<R> {
    inner: R,
    commands: Vec<Command>,
}

impl<R: Rasterizer> Recorder<R> {
    /// Start recording calls made on `inner`.
    #[inline]
    pub fn new(inner: R) -> Self {
        Recorder {
            inner,
            commands: Vec::new(),
        }
    }

    /// The commands recorded so far.
    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forget every recorded command.
    #[inline]
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Count the recorded commands matching a predicate.
    #[inline]
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|&c| pred(c)).count()
    }

    /// Count the recorded draws.
    #[inline]
    pub fn draw_calls(&self) -> usize {
        self.count(Command::is_draw)
    }

    #[inline]
    pub fn inner(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn record(&mut self, command: Command) {
        log::trace!("Recorded {:?}", &command);
        self.commands.push(command);
    }
}

impl<R: Rasterizer> Rasterizer for Recorder<R> {
    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }

    fn viewport_generation(&self) -> u64 {
        self.inner.viewport_generation()
    }

    fn height(&self) -> i32 {
        self.inner.height()
    }

    fn is_offscreen(&self) -> bool {
        self.inner.is_offscreen()
    }

    fn transform(&self) -> Transform {
        self.inner.transform()
    }

    fn set_transform(&mut self, transform: Transform) {
        self.record(Command::SetTransform(transform));
        self.inner.set_transform(transform);
    }

    fn set_scissor(&mut self, scissor: Option<ScissorRect>) -> Result {
        self.record(Command::Scissor(scissor));
        self.inner.set_scissor(scissor)
    }

    fn set_stencil_test(&mut self, enabled: bool) -> Result {
        self.record(Command::StencilTest(enabled));
        self.inner.set_stencil_test(enabled)
    }

    fn set_stencil_func(&mut self, func: StencilFunc, reference: u8, mask: u8) -> Result {
        self.record(Command::StencilFunc(func, reference, mask));
        self.inner.set_stencil_func(func, reference, mask)
    }

    fn set_stencil_op(&mut self, op: StencilOp) -> Result {
        self.record(Command::StencilOp(op));
        self.inner.set_stencil_op(op)
    }

    fn set_stencil_write_mask(&mut self, mask: u8) -> Result {
        self.record(Command::StencilWriteMask(mask));
        self.inner.set_stencil_write_mask(mask)
    }

    fn set_write_masks(&mut self, color: bool, depth: bool) -> Result {
        self.record(Command::WriteMasks { color, depth });
        self.inner.set_write_masks(color, depth)
    }

    fn clear_stencil(&mut self, value: u8) -> Result {
        self.record(Command::ClearStencil(value));
        self.inner.clear_stencil(value)
    }

    fn draw_rectangle(&mut self, rect: LocalRect) -> Result {
        self.record(Command::DrawRectangle(rect));
        self.inner.draw_rectangle(rect)
    }

    fn draw_primitive(&mut self, primitive: &Primitive) -> Result {
        self.record(Command::DrawPrimitive);
        self.inner.draw_primitive(primitive)
    }
}

impl<R: Rasterizer> StencilDraw for Recorder<R> {}
