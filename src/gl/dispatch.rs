// MIT/Apache2 License

use super::{GlFunction, GlFunctions};
use std::ffi::CStr;

/// The type used to look up GL entry points.
pub trait GlDispatch {
    /// Create a list of addresses to functions needed for clipping.
    #[inline]
    fn functions(&mut self) -> crate::Result<GlFunctions> {
        GlFunctions::create_from(self)
    }

    /// Get the procedural address of the given function.
    fn get_proc_address(&mut self, name: &CStr) -> crate::Result<GlFunction>;
}

impl<D: GlDispatch + ?Sized> GlDispatch for &mut D {
    #[inline]
    fn get_proc_address(&mut self, name: &CStr) -> crate::Result<GlFunction> {
        (**self).get_proc_address(name)
    }
}
