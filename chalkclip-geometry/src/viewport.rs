// BSL 1.0 License

use super::{round_out, DeviceBox, Point2D, Transform3D};
use euclid::point2;

/// The region of a render target that normalized device coordinates map onto.
///
/// Coordinates are in device pixels with the origin at the top left.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a new viewport.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Map a point in normalized device coordinates into device space.
    ///
    /// NDC Y points up while device Y points down, so the Y axis is flipped.
    #[must_use]
    pub fn ndc_to_device(&self, ndc: Point2D<f32>) -> Point2D<f32> {
        point2(
            self.x + (ndc.x + 1.0) * (self.width / 2.0),
            self.y + (1.0 - ndc.y) * (self.height / 2.0),
        )
    }

    /// The pixels covered by this viewport.
    #[must_use]
    pub fn device_box(&self) -> DeviceBox {
        round_out(vec![
            point2(self.x, self.y),
            point2(self.x + self.width, self.y + self.height),
        ])
    }

    /// A projection that maps device-space coordinates onto this viewport,
    /// so that drawing with it lands on exactly the given pixels.
    #[must_use]
    pub fn device_projection(&self) -> Transform3D<f32> {
        Transform3D::ortho(
            self.x,
            self.x + self.width,
            self.y + self.height,
            self.y,
            -1.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ndc_corners() {
        let vp = Viewport::new(10.0, 20.0, 200.0, 100.0);
        let tl = vp.ndc_to_device(point2(-1.0, 1.0));
        let br = vp.ndc_to_device(point2(1.0, -1.0));
        assert_relative_eq!(tl.x, 10.0);
        assert_relative_eq!(tl.y, 20.0);
        assert_relative_eq!(br.x, 210.0);
        assert_relative_eq!(br.y, 120.0);
    }

    #[test]
    fn test_device_projection_round_trip() {
        let vp = Viewport::new(10.0, 20.0, 200.0, 100.0);
        let proj = vp.device_projection();
        let ndc = proj
            .transform_point2d_homogeneous(point2(60.0, 45.0))
            .to_point2d()
            .unwrap();
        let dev = vp.ndc_to_device(ndc);
        assert_relative_eq!(dev.x, 60.0, epsilon = 1e-4);
        assert_relative_eq!(dev.y, 45.0, epsilon = 1e-4);
    }
}
