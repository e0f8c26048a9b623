// MIT/Apache2 License

//! Render targets the clip machinery can run against without a GPU.

mod noop;
pub use noop::NoopRasterizer;

mod recorder;
pub use recorder::{Command, Recorder};

mod swrast;
pub use swrast::SoftwareTarget;
