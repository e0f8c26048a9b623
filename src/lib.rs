// MIT/Apache2 License

//! Clip-region compositing for immediate mode renderers.
//!
//! Clip shapes are pushed onto a persistent [`ClipStack`]. When the renderer
//! is about to draw, a [`FlushCache`] makes the stack current on a
//! [`Rasterizer`]: the intersection of every shape's device bounds becomes
//! the scissor rectangle, and any shape a scissor rectangle can't express is
//! ANDed into the stencil buffer.

#![cfg_attr(not(feature = "gl"), forbid(unsafe_code))]

mod bounds;
mod config;
mod error;
mod flush;
mod primitive;
mod rasterizer;
mod scissor;
mod stack;
mod stencil;

pub mod backend;

#[cfg(feature = "gl")]
pub mod gl;

pub use backend::{Command, NoopRasterizer, Recorder, SoftwareTarget};
pub use bounds::*;
pub use config::*;
pub use error::*;
pub use flush::*;
pub use primitive::*;
pub use rasterizer::*;
pub use scissor::*;
pub use stack::*;
pub use stencil::*;

#[doc(inline)]
pub use chalkclip_geometry as geometry;
