// BSL 1.0 License

//! Contains the geometry primitives used by the `chalkclip` crate.
//!
//! Device-space quantities are integer pixels with the origin at the top left
//! corner of the render target. Local-space quantities are `f32` and are
//! mapped into device space by a [`Transform`] and a [`Viewport`].

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod bounds;
pub use bounds::*;

mod mesh;
pub use mesh::*;

mod transform;
pub use transform::*;

mod viewport;
pub use viewport::*;

pub(crate) mod util;

#[doc(inline)]
pub use euclid::default::{Box2D, Point2D, Transform3D};
#[doc(inline)]
pub use euclid::{point2, Angle};
#[doc(inline)]
pub use lyon_geom::Triangle;
#[doc(inline)]
pub use lyon_path::{Path, Winding};
#[doc(inline)]
pub use lyon_tessellation::{FillRule, TessellationError};
