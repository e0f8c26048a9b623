// MIT/Apache2 License

//! The persistent clip stack.
//!
//! A [`ClipStack`] is a handle to the top entry of a singly linked list of
//! [`ClipEntry`]s. Entries are never modified once they are pushed, so
//! several stacks can share the same ancestors. Saving the clip state is as
//! cheap as cloning the handle, and restoring it is as cheap as dropping the
//! newer one.

use crate::Primitive;
use chalkclip_geometry::{
    intersect, is_axis_aligned, round_out, unbounded, Box2D, DeviceBox, LocalRect, Transform,
    Viewport,
};
use std::{fmt, iter::FusedIterator, rc::Rc};

/// A handle to the top of a clip stack.
///
/// Cloning the handle retains the entries and dropping it releases them. The
/// default value is the empty stack, which clips nothing.
#[derive(Clone, Default)]
pub struct ClipStack {
    top: Option<Rc<ClipEntry>>,
}

/// One shape in a clip stack.
pub struct ClipEntry {
    kind: EntryKind,
    parent: ClipStack,
    // the device bounds of this entry's shape alone
    own_bounds: DeviceBox,
    // own_bounds intersected with the parent's bounds
    bounds: DeviceBox,
    // modelview and projection the shape was pushed under
    transform: Transform,
}

/// The shape held by a [`ClipEntry`].
#[derive(Debug, Clone)]
pub enum EntryKind {
    /// A rectangle in local space.
    Rect {
        rect: LocalRect,
        /// True if the transformed rectangle is axis-aligned in device
        /// space, so the scissor rectangle can stand in for it.
        ///
        /// The scissor only holds whole pixels, and the rectangle's bounds
        /// are rounded outwards. An edge that falls inside a pixel therefore
        /// keeps that whole pixel, where the same rectangle drawn into the
        /// stencil would only keep the pixels whose centers it covers.
        can_be_scissor: bool,
    },
    /// An arbitrary silhouette.
    Primitive {
        primitive: Rc<Primitive>,
        bounds: LocalRect,
    },
    /// A rectangle already in device space. It only ever narrows the
    /// scissor rectangle.
    WindowRect { rect: DeviceBox },
}

impl EntryKind {
    /// Does this shape have to be rasterized into the stencil buffer?
    #[inline]
    pub fn needs_stencil(&self) -> bool {
        match self {
            EntryKind::Rect { can_be_scissor, .. } => !can_be_scissor,
            EntryKind::Primitive { .. } => true,
            EntryKind::WindowRect { .. } => false,
        }
    }
}

impl ClipStack {
    /// The empty clip stack.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a rectangle in local space.
    ///
    /// The rectangle can be realized by scissoring alone if `transform` keeps
    /// it axis-aligned on the target.
    pub fn push_rect(&self, rect: LocalRect, transform: &Transform, viewport: &Viewport) -> Self {
        let (own_bounds, can_be_scissor) = if rect.is_empty() {
            (Box2D::zero(), true)
        } else {
            match transform.project_rect(&rect, viewport) {
                Some(quad) => (round_out(quad.iter().copied()), is_axis_aligned(&quad)),
                None => {
                    log::warn!("Clip rectangle {:?} reaches behind the eye", rect);
                    (viewport.device_box(), false)
                }
            }
        };

        self.push_entry(
            EntryKind::Rect {
                rect,
                can_be_scissor,
            },
            own_bounds,
            *transform,
        )
    }

    /// Push an arbitrary silhouette.
    ///
    /// `bounds` is the local-space bounding box of the primitive, which is
    /// usually `primitive.bounds()`.
    pub fn push_primitive(
        &self,
        primitive: Rc<Primitive>,
        bounds: LocalRect,
        transform: &Transform,
        viewport: &Viewport,
    ) -> Self {
        let own_bounds = match transform.project_rect(&bounds, viewport) {
            Some(quad) => round_out(quad.iter().copied()),
            None => {
                log::warn!("Clip primitive bounds {:?} reach behind the eye", bounds);
                viewport.device_box()
            }
        };

        self.push_entry(
            EntryKind::Primitive { primitive, bounds },
            own_bounds,
            *transform,
        )
    }

    /// Push a rectangle in device space.
    pub fn push_window_rect(&self, rect: DeviceBox) -> Self {
        self.push_entry(EntryKind::WindowRect { rect }, rect, Transform::identity())
    }

    fn push_entry(&self, kind: EntryKind, own_bounds: DeviceBox, transform: Transform) -> Self {
        let parent_bounds = self.top().map_or_else(unbounded, |top| top.bounds);

        ClipStack {
            top: Some(Rc::new(ClipEntry {
                kind,
                parent: self.clone(),
                own_bounds,
                bounds: intersect(&own_bounds, &parent_bounds),
                transform,
            })),
        }
    }

    /// The stack below the top entry. Popping the empty stack yields the
    /// empty stack.
    #[inline]
    pub fn pop(&self) -> Self {
        self.top().map(|top| top.parent.clone()).unwrap_or_default()
    }

    /// The topmost entry, if there is one.
    #[inline]
    pub fn top(&self) -> Option<&ClipEntry> {
        self.top.as_deref()
    }

    /// Is this the empty stack?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// The number of entries in this stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Iterate over the entries, from the top of the stack to the bottom.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self.top() }
    }

    /// Are these two handles the same stack?
    ///
    /// This compares identity, not contents: two stacks built from equal
    /// pushes are still different stacks.
    #[inline]
    pub fn ptr_eq(&self, other: &ClipStack) -> bool {
        match (&self.top, &other.top) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The number of handles sharing the top entry, or zero for the empty
    /// stack.
    #[inline]
    pub fn handle_count(&self) -> usize {
        self.top.as_ref().map_or(0, Rc::strong_count)
    }
}

impl fmt::Debug for ClipStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ClipStack {
    type Item = &'a ClipEntry;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl ClipEntry {
    /// The shape of this entry.
    #[inline]
    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// The stack this entry was pushed onto.
    #[inline]
    pub fn parent(&self) -> &ClipStack {
        &self.parent
    }

    /// The device bounds of this entry's own shape.
    #[inline]
    pub fn own_bounds(&self) -> DeviceBox {
        self.own_bounds
    }

    /// The device bounds of this entry intersected with all of its ancestors.
    #[inline]
    pub fn bounds(&self) -> DeviceBox {
        self.bounds
    }

    /// The transform this entry's shape was pushed under.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// See [`EntryKind::needs_stencil`].
    #[inline]
    pub fn needs_stencil(&self) -> bool {
        self.kind.needs_stencil()
    }
}

impl fmt::Debug for ClipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // leave out the parent, the stack prints the whole chain
        f.debug_struct("ClipEntry")
            .field("kind", &self.kind)
            .field("own_bounds", &self.own_bounds)
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl Drop for ClipEntry {
    fn drop(&mut self) {
        // release ancestors in a loop, a deep stack would overflow the call
        // stack if every entry dropped its parent recursively
        let mut next = self.parent.top.take();
        while let Some(entry) = next {
            next = match Rc::try_unwrap(entry) {
                Ok(mut entry) => entry.parent.top.take(),
                Err(_) => None,
            };
        }
    }
}

/// Iterator over the entries of a [`ClipStack`], from top to bottom.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    next: Option<&'a ClipEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ClipEntry;

    #[inline]
    fn next(&mut self) -> Option<&'a ClipEntry> {
        let entry = self.next?;
        self.next = entry.parent.top();
        Some(entry)
    }
}

impl<'a> FusedIterator for Iter<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use chalkclip_geometry::{is_degenerate, point2, Angle, Transform3D};

    fn viewport() -> Viewport {
        Viewport::new(0.0, 0.0, 200.0, 200.0)
    }

    fn ortho() -> Transform {
        Transform::orthographic(200.0, 200.0)
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> LocalRect {
        Box2D::new(point2(x0, y0), point2(x1, y1))
    }

    #[test]
    fn test_push_rect_bounds() {
        let stack = ClipStack::new().push_rect(rect(10.0, 20.0, 110.0, 70.5), &ortho(), &viewport());
        let top = stack.top().unwrap();
        assert_eq!(top.own_bounds(), Box2D::new(point2(10, 20), point2(110, 71)));
        assert_eq!(top.bounds(), top.own_bounds());
        assert!(!top.needs_stencil());
    }

    #[test]
    fn test_fractional_scissor_keeps_partial_pixels() {
        let stack = ClipStack::new().push_rect(rect(10.0, 10.0, 20.3, 20.3), &ortho(), &viewport());
        let top = stack.top().unwrap();
        assert!(!top.needs_stencil());
        assert_eq!(top.own_bounds(), Box2D::new(point2(10, 10), point2(21, 21)));
    }

    #[test]
    fn test_rotated_rect_needs_stencil() {
        let t = ortho().pre_transform(&Transform3D::rotation(0.0, 0.0, 1.0, Angle::degrees(45.0)));
        let stack = ClipStack::new().push_rect(rect(50.0, 0.0, 100.0, 50.0), &t, &viewport());
        assert!(stack.top().unwrap().needs_stencil());
    }

    #[test]
    fn test_bounds_shrink_down_the_stack() {
        let stack = ClipStack::new()
            .push_rect(rect(0.0, 0.0, 100.0, 100.0), &ortho(), &viewport())
            .push_window_rect(Box2D::new(point2(50, 50), point2(150, 150)));
        let top = stack.top().unwrap();
        assert_eq!(top.own_bounds(), Box2D::new(point2(50, 50), point2(150, 150)));
        assert_eq!(top.bounds(), Box2D::new(point2(50, 50), point2(100, 100)));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_empty_rect_is_zero_area() {
        let stack = ClipStack::new().push_rect(rect(10.0, 10.0, 10.0, 50.0), &ortho(), &viewport());
        assert!(is_degenerate(&stack.top().unwrap().bounds()));
    }

    #[test]
    fn test_pop_restores_parent() {
        let base = ClipStack::new().push_rect(rect(0.0, 0.0, 100.0, 100.0), &ortho(), &viewport());
        let pushed = base.push_window_rect(Box2D::new(point2(10, 10), point2(20, 20)));
        assert!(pushed.pop().ptr_eq(&base));
        assert!(base.pop().ptr_eq(&ClipStack::new()));
        assert!(ClipStack::new().pop().is_empty());
    }

    #[test]
    fn test_branches_share_ancestors() {
        let base = ClipStack::new().push_window_rect(Box2D::new(point2(0, 0), point2(100, 100)));
        let a = base.push_window_rect(Box2D::new(point2(0, 0), point2(10, 10)));
        let b = base.push_window_rect(Box2D::new(point2(50, 50), point2(60, 60)));

        assert!(!a.ptr_eq(&b));
        assert!(a.pop().ptr_eq(&b.pop()));
        // `base` plus one parent link from each branch
        assert_eq!(base.handle_count(), 3);

        drop(a);
        assert_eq!(base.handle_count(), 2);
        drop(b);
        assert_eq!(base.handle_count(), 1);
    }

    #[test]
    fn test_release_cascades() {
        let prim = Rc::new(Primitive::from_mesh(chalkclip_geometry::Mesh::rectangle(&rect(
            0.0, 0.0, 10.0, 10.0,
        ))));
        let stack = ClipStack::new()
            .push_primitive(prim.clone(), prim.bounds(), &ortho(), &viewport())
            .push_window_rect(Box2D::new(point2(0, 0), point2(5, 5)));
        assert_eq!(Rc::strong_count(&prim), 2);

        drop(stack);
        assert_eq!(Rc::strong_count(&prim), 1);
    }

    #[test]
    fn test_deep_stack_drops() {
        let mut stack = ClipStack::new();
        for i in 0..100_000 {
            stack = stack.push_window_rect(Box2D::new(point2(0, 0), point2(i, i)));
        }
        assert_eq!(stack.depth(), 100_000);
        drop(stack);
    }
}
