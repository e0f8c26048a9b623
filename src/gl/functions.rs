// MIT/Apache2 License

#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use super::GlDispatch;
use std::{
    ffi::{c_void, CStr},
    mem,
    os::raw::{c_int, c_uchar, c_uint},
    ptr::NonNull,
};

/* GL Types */
pub type GLboolean = c_uchar;
pub type GLenum = c_uint;
pub type GLbitfield = c_uint;
pub type GLint = c_int;
pub type GLuint = c_uint;
pub type GLsizei = c_int;

/* GL Constants */
pub const GL_FALSE: GLboolean = 0;
pub const GL_TRUE: GLboolean = 1;

pub const GL_SCISSOR_TEST: GLenum = 0x0C11;
pub const GL_STENCIL_TEST: GLenum = 0x0B90;
pub const GL_STENCIL_BUFFER_BIT: GLbitfield = 0x0000_0400;

pub const GL_NEVER: GLenum = 0x0200;
pub const GL_LESS: GLenum = 0x0201;
pub const GL_EQUAL: GLenum = 0x0202;
pub const GL_LEQUAL: GLenum = 0x0203;
pub const GL_GREATER: GLenum = 0x0204;
pub const GL_NOTEQUAL: GLenum = 0x0205;
pub const GL_GEQUAL: GLenum = 0x0206;
pub const GL_ALWAYS: GLenum = 0x0207;

pub const GL_ZERO: GLenum = 0;
pub const GL_INVERT: GLenum = 0x150A;
pub const GL_KEEP: GLenum = 0x1E00;
pub const GL_REPLACE: GLenum = 0x1E01;
pub const GL_INCR: GLenum = 0x1E02;
pub const GL_DECR: GLenum = 0x1E03;

/// Thread safe container for a GL function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct GlFunction(NonNull<c_void>);

impl GlFunction {
    /// Create a new GL function pointer.
    ///
    /// # Safety
    ///
    /// Behavior is undefined if the pointer is not, in fact, a pointer to the
    /// GL function it was looked up as.
    #[inline]
    pub const unsafe fn new(ptr: NonNull<c_void>) -> Self {
        Self(ptr)
    }

    /// Get the inner pointer.
    #[inline]
    pub fn into_inner(self) -> NonNull<c_void> {
        self.0
    }
}

/// Static container for a CStr.
#[derive(Copy, Clone)]
#[repr(transparent)]
struct StaticCstr {
    inner: &'static str,
}

impl StaticCstr {
    #[inline]
    const fn new(inner: &'static str) -> Self {
        Self { inner }
    }

    #[inline]
    fn get(self) -> crate::Result<&'static CStr> {
        CStr::from_bytes_with_nul(self.inner.as_bytes()).map_err(crate::Error::from_display)
    }
}

macro_rules! define_gl_functions {
    ($($fname: ident : $ty: ty),*) => {
        /// The GL entry points needed to program clip state.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct GlFunctions {
            $(pub $fname: $ty),*
        }

        $(
            const $fname: StaticCstr = StaticCstr::new(concat!("gl", stringify!($fname), '\0'));
        )*

        impl GlFunctions {
            #[inline]
            pub(crate) fn create_from<D: GlDispatch + ?Sized>(dispatch: &mut D) -> crate::Result<Self> {
                Ok(Self {
                    $(
                        // SAFETY: translation to gl function pointer is upheld by the contract for
                        //         GlFunction::new()
                        $fname: unsafe {
                            mem::transmute::<GlFunction, $ty>(dispatch.get_proc_address($fname.get()?)?)
                        }
                    ),*
                })
            }
        }
    }
}

define_gl_functions! {
    // Capabilities
    Enable: unsafe extern "C" fn(GLenum),
    Disable: unsafe extern "C" fn(GLenum),

    // Scissor
    Scissor: unsafe extern "C" fn(GLint, GLint, GLsizei, GLsizei),

    // Stencil
    StencilFunc: unsafe extern "C" fn(GLenum, GLint, GLuint),
    StencilOp: unsafe extern "C" fn(GLenum, GLenum, GLenum),
    StencilMask: unsafe extern "C" fn(GLuint),
    ClearStencil: unsafe extern "C" fn(GLint),
    Clear: unsafe extern "C" fn(GLbitfield),

    // Write masks
    ColorMask: unsafe extern "C" fn(GLboolean, GLboolean, GLboolean, GLboolean),
    DepthMask: unsafe extern "C" fn(GLboolean)
}
