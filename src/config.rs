// MIT/Apache2 License

/// How the stencil buffer is zeroed before the first silhouette is drawn
/// into it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StencilClearPolicy {
    /// Clear the stencil buffer. The clear only touches the pixels inside the
    /// scissor rectangle, which is the bounding box of the whole clip.
    ScissoredClear,
    /// Draw a zeroing rectangle over the bounds of the first stencil entry.
    ///
    /// The scissor rectangle lies inside those bounds, so this zeroes the
    /// same pixels as a clear. Some backends draw faster than they clear.
    BoundsRect,
}

impl Default for StencilClearPolicy {
    #[inline]
    fn default() -> Self {
        StencilClearPolicy::ScissoredClear
    }
}

/// Knobs for flushing clip stacks onto a render target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClipConfig {
    /// Some drivers don't clip primitives against offset viewports. When this
    /// is set, the scissor rectangle is always intersected with the viewport,
    /// and clip state is reflushed whenever the viewport changes.
    pub viewport_scissor_workaround: bool,
    /// See [`StencilClearPolicy`].
    pub stencil_clear: StencilClearPolicy,
}
