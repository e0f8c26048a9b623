// MIT/Apache2 License

use crate::{composite_stencil, get_bounds, plan_scissor, ClipConfig, ClipStack, Result, StencilDraw};

/// Remembers which clip stack was last made current on a render target, so
/// flushing the same stack twice in a row does no work.
///
/// The cache holds its own handle to the flushed stack. This keeps the stack
/// alive, and with it the identity the next flush compares against.
///
/// A cache belongs to one render target. It records which stack was flushed
/// but not where, so flushing the same stack onto a second target through
/// the same cache does nothing. Call [`FlushCache::invalidate`] when the
/// cache is moved to a different target, or keep one cache per target.
#[derive(Debug, Default)]
pub struct FlushCache {
    last_stack: Option<ClipStack>,
    viewport_generation: u64,
    valid: bool,
    config: ClipConfig,
}

impl FlushCache {
    /// Create an empty cache. The first flush always reaches the target.
    #[inline]
    pub fn new(config: ClipConfig) -> Self {
        FlushCache {
            config,
            ..Default::default()
        }
    }

    /// The configuration this cache flushes with.
    #[inline]
    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    /// The stack that was last flushed, if the cache is still valid.
    #[inline]
    pub fn current(&self) -> Option<&ClipStack> {
        if self.valid {
            self.last_stack.as_ref()
        } else {
            None
        }
    }

    /// Forget what was last flushed. The next flush reprograms the target
    /// no matter which stack it is given.
    #[inline]
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    fn is_current(&self, stack: &ClipStack, viewport_generation: u64) -> bool {
        self.valid
            && self.last_stack.as_ref().map_or(false, |last| last.ptr_eq(stack))
            && (!self.config.viewport_scissor_workaround
                || self.viewport_generation == viewport_generation)
    }

    /// Make `stack` the active clip state on `target`.
    ///
    /// Unless the target already has this exact stack applied, `pending` is
    /// called first with the target, so draws queued under the old clip
    /// state reach the target before that state changes.
    pub fn flush<R, F>(&mut self, stack: &ClipStack, target: &mut R, pending: F) -> Result
    where
        R: StencilDraw + ?Sized,
        F: FnOnce(&mut R) -> Result,
    {
        let generation = target.viewport_generation();
        if self.is_current(stack, generation) {
            log::trace!("Clip stack is already current");
            return Ok(());
        }

        pending(&mut *target)?;

        // stays invalid until the target has been fully reprogrammed
        self.valid = false;
        self.last_stack = Some(stack.clone());
        self.viewport_generation = generation;

        self.apply(stack, target)?;
        self.valid = true;
        Ok(())
    }

    fn apply<R: StencilDraw + ?Sized>(&self, stack: &ClipStack, target: &mut R) -> Result {
        target.set_stencil_test(false)?;

        let workaround = self.config.viewport_scissor_workaround;
        if stack.is_empty() && !workaround {
            log::debug!("Flushing empty clip stack");
            return target.set_scissor(None);
        }

        let bounds = get_bounds(stack);
        let plan = plan_scissor(bounds, &target.geometry(), workaround);
        log::debug!(
            "Setting scissor to ({}, {}, {}, {})",
            plan.rect.x,
            plan.rect.y,
            plan.rect.width,
            plan.rect.height
        );
        target.set_scissor(Some(plan.rect))?;

        if plan.is_empty() {
            log::debug!("Clip bounds are empty, skipping stencil");
            return Ok(());
        }

        let using_stencil =
            composite_stencil(target, stack, plan.bounds, self.config.stencil_clear)?;
        log::trace!("Stencil buffer in use: {}", using_stencil);
        Ok(())
    }
}
