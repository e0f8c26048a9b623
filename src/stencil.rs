// MIT/Apache2 License

//! Rasterizing clip silhouettes into the stencil buffer.
//!
//! The stencil buffer ends up holding `1` exactly where every non-scissor
//! clip shape overlaps. The first shape is written directly. Every shape
//! after it is ANDed in with two draws: the shape increments the buffer, so
//! pixels inside both the old mask and the new shape reach `2`, and then a
//! rectangle over the whole clip bounds decrements everything, leaving `1`
//! only where the value was `2`.

use crate::{
    ClipStack, EntryKind, Primitive, Rasterizer, Result, StencilClearPolicy, StencilFunc,
    StencilOp,
};
use chalkclip_geometry::{DeviceBox, LocalRect, Transform};

/// A clip shape that has to go into the stencil buffer.
#[derive(Debug, Copy, Clone)]
pub enum Shape<'a> {
    Rect(LocalRect),
    Primitive(&'a Primitive),
}

/// The stencil operations the clip compositor is built from.
///
/// Every method has a default implementation in terms of [`Rasterizer`]
/// calls. Backends with a faster way to do one of them can override it.
pub trait StencilDraw: Rasterizer {
    /// Zero the stencil values inside the scissor rectangle.
    fn clear(&mut self) -> Result {
        self.clear_stencil(0)
    }

    /// Zero the stencil values inside a device-space box by drawing over it.
    fn zero_over(&mut self, bounds: DeviceBox) -> Result {
        self.set_stencil_func(StencilFunc::Never, 0, 0)?;
        self.set_stencil_op(StencilOp::Zero)?;
        draw_device_box(self, bounds)
    }

    /// Write `reference` wherever `shape` covers, leaving everything else
    /// untouched.
    fn write_exact(
        &mut self,
        shape: Shape<'_>,
        transform: &Transform,
        reference: u8,
        mask: u8,
    ) -> Result {
        self.set_stencil_func(StencilFunc::Never, reference, mask)?;
        self.set_stencil_op(StencilOp::Replace)?;
        draw_shape(self, shape, transform)
    }

    /// Add one to the stencil value wherever `shape` covers.
    fn increment_where_covered(&mut self, shape: Shape<'_>, transform: &Transform) -> Result {
        self.set_stencil_func(StencilFunc::Never, 0x1, 0x3)?;
        self.set_stencil_op(StencilOp::Incr)?;
        draw_shape(self, shape, transform)
    }

    /// Subtract one from every stencil value inside a device-space box.
    fn decrement_over(&mut self, bounds: DeviceBox) -> Result {
        self.set_stencil_func(StencilFunc::Never, 0x1, 0x3)?;
        self.set_stencil_op(StencilOp::Decr)?;
        draw_device_box(self, bounds)
    }

    /// Leave the stencil test set up so ordinary draws only land where the
    /// stencil value is `1`.
    fn gate_draws(&mut self) -> Result {
        self.set_stencil_func(StencilFunc::Equal, 0x1, 0x1)?;
        self.set_stencil_op(StencilOp::Keep)
    }
}

impl<S: StencilDraw + ?Sized> StencilDraw for &mut S {
    fn clear(&mut self) -> Result {
        (**self).clear()
    }
    fn zero_over(&mut self, bounds: DeviceBox) -> Result {
        (**self).zero_over(bounds)
    }
    fn write_exact(
        &mut self,
        shape: Shape<'_>,
        transform: &Transform,
        reference: u8,
        mask: u8,
    ) -> Result {
        (**self).write_exact(shape, transform, reference, mask)
    }
    fn increment_where_covered(&mut self, shape: Shape<'_>, transform: &Transform) -> Result {
        (**self).increment_where_covered(shape, transform)
    }
    fn decrement_over(&mut self, bounds: DeviceBox) -> Result {
        (**self).decrement_over(bounds)
    }
    fn gate_draws(&mut self) -> Result {
        (**self).gate_draws()
    }
}

fn draw_shape<R: Rasterizer + ?Sized>(target: &mut R, shape: Shape<'_>, transform: &Transform) -> Result {
    target.set_transform(*transform);
    match shape {
        Shape::Rect(rect) => target.draw_rectangle(rect),
        Shape::Primitive(primitive) => target.draw_primitive(primitive),
    }
}

fn draw_device_box<R: Rasterizer + ?Sized>(target: &mut R, bounds: DeviceBox) -> Result {
    let transform = Transform::device(&target.viewport());
    target.set_transform(transform);
    target.draw_rectangle(bounds.to_f32())
}

/// Rasterize every entry of `stack` that scissoring can't express into the
/// stencil buffer, and leave the stencil test gating later draws.
///
/// `bounds` are the device bounds of the whole clip; the scissor rectangle
/// must already be set to them. Returns whether the stencil buffer was used.
/// A stack with no stencil entries issues no calls at all. Otherwise the
/// target's transform is restored before returning, even on error.
pub fn composite_stencil<R: StencilDraw + ?Sized>(
    target: &mut R,
    stack: &ClipStack,
    bounds: DeviceBox,
    policy: StencilClearPolicy,
) -> Result<bool> {
    if !stack.iter().any(|entry| entry.needs_stencil()) {
        return Ok(false);
    }

    let saved = target.transform();
    let result = composite_entries(target, stack, bounds, policy);
    target.set_transform(saved);
    result
}

fn composite_entries<R: StencilDraw + ?Sized>(
    target: &mut R,
    stack: &ClipStack,
    bounds: DeviceBox,
    policy: StencilClearPolicy,
) -> Result<bool> {
    let mut using_stencil = false;

    for entry in stack.iter().filter(|entry| entry.needs_stencil()) {
        let shape = match entry.kind() {
            EntryKind::Rect { rect, .. } => {
                log::trace!("Adding stencil clip for rectangle {:?}", rect);
                Shape::Rect(*rect)
            }
            EntryKind::Primitive { primitive, .. } => {
                log::trace!("Adding stencil clip for primitive");
                Shape::Primitive(primitive)
            }
            // scissor covers these completely
            EntryKind::WindowRect { .. } => continue,
        };

        if using_stencil {
            target.increment_where_covered(shape, entry.transform())?;
            target.decrement_over(bounds)?;
        } else {
            target.set_write_masks(false, false)?;
            target.set_stencil_write_mask(!0)?;
            target.set_stencil_test(true)?;

            match policy {
                StencilClearPolicy::ScissoredClear => target.clear()?,
                StencilClearPolicy::BoundsRect => target.zero_over(entry.own_bounds())?,
            }

            target.write_exact(shape, entry.transform(), 0x1, 0x1)?;
            using_stencil = true;
        }

        target.gate_draws()?;
    }

    if using_stencil {
        target.set_write_masks(true, true)?;
    }

    Ok(using_stencil)
}
