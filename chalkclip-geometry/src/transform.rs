// BSL 1.0 License

use super::{LocalRect, Point2D, Transform3D, Viewport};
use crate::util::approx_eq_within;
use euclid::point2;

/// Device-space distance under which two transformed coordinates are
/// considered to lie on the same pixel edge.
const AXIS_ALIGN_TOLERANCE: f32 = 1.0e-3;

/// The pair of matrices that place local geometry on a render target.
///
/// These are the two "slots" a render target keeps current: the modelview
/// matrix maps local space into eye space, and the projection matrix maps eye
/// space into normalized device coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub modelview: Transform3D<f32>,
    pub projection: Transform3D<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from its two matrices.
    #[must_use]
    pub fn new(modelview: Transform3D<f32>, projection: Transform3D<f32>) -> Self {
        Self {
            modelview,
            projection,
        }
    }

    /// Both matrices set to the identity. Local space is then NDC.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Transform3D::identity(), Transform3D::identity())
    }

    /// A 2D orthographic setup where local `(0, 0)..(width, height)` covers
    /// the whole viewport, Y pointing down.
    #[must_use]
    pub fn orthographic(width: f32, height: f32) -> Self {
        Self::new(
            Transform3D::identity(),
            Transform3D::ortho(0.0, width, height, 0.0, -1.0, 1.0),
        )
    }

    /// A setup where local space is device space for the given viewport.
    #[must_use]
    pub fn device(viewport: &Viewport) -> Self {
        Self::new(Transform3D::identity(), viewport.device_projection())
    }

    /// Apply `local` to geometry before the current modelview matrix.
    #[must_use]
    pub fn pre_transform(self, local: &Transform3D<f32>) -> Self {
        Self {
            modelview: local.then(&self.modelview),
            ..self
        }
    }

    /// The single matrix from local space to clip space.
    #[must_use]
    pub fn combined(&self) -> Transform3D<f32> {
        self.modelview.then(&self.projection)
    }

    /// Map a local point into device space.
    ///
    /// Returns `None` if the point ends up behind the eye.
    #[must_use]
    pub fn project_point(&self, pt: Point2D<f32>, viewport: &Viewport) -> Option<Point2D<f32>> {
        let ndc = self.combined().transform_point2d_homogeneous(pt).to_point2d()?;
        Some(viewport.ndc_to_device(ndc))
    }

    /// Map the four corners of a local rectangle into device space.
    ///
    /// The corners are returned in the order top-left, top-right,
    /// bottom-right, bottom-left of the local rectangle.
    #[must_use]
    pub fn project_rect(&self, rect: &LocalRect, viewport: &Viewport) -> Option<[Point2D<f32>; 4]> {
        let combined = self.combined();
        let project = |x: f32, y: f32| {
            combined
                .transform_point2d_homogeneous(point2(x, y))
                .to_point2d()
                .map(|ndc| viewport.ndc_to_device(ndc))
        };

        Some([
            project(rect.min.x, rect.min.y)?,
            project(rect.max.x, rect.min.y)?,
            project(rect.max.x, rect.max.y)?,
            project(rect.min.x, rect.max.y)?,
        ])
    }
}

/// Tell if a projected quad (as returned by [`Transform::project_rect`]) is an
/// axis-aligned rectangle in device space.
///
/// Both the unrotated winding and a quarter-turn winding are accepted.
#[must_use]
pub fn is_axis_aligned(quad: &[Point2D<f32>; 4]) -> bool {
    let eq = |a: f32, b: f32| approx_eq_within(a, b, AXIS_ALIGN_TOLERANCE);
    let [a, b, c, d] = *quad;

    (eq(a.y, b.y) && eq(b.x, c.x) && eq(c.y, d.y) && eq(d.x, a.x))
        || (eq(a.x, b.x) && eq(b.y, c.y) && eq(c.x, d.x) && eq(d.y, a.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Angle;
    use approx::assert_relative_eq;
    use euclid::default::Box2D;

    fn vp() -> Viewport {
        Viewport::new(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn test_orthographic_is_pixel_aligned() {
        let t = Transform::orthographic(200.0, 200.0);
        let pt = t.project_point(point2(80.0, 150.0), &vp()).unwrap();
        assert_relative_eq!(pt.x, 80.0, epsilon = 1e-4);
        assert_relative_eq!(pt.y, 150.0, epsilon = 1e-4);
    }

    #[test]
    fn test_scaled_rect_is_axis_aligned() {
        let t = Transform::orthographic(200.0, 200.0)
            .pre_transform(&Transform3D::scale(2.0, 0.5, 1.0).then_translate(euclid::vec3(5.0, 7.0, 0.0)));
        let rect = Box2D::new(point2(10.0, 10.0), point2(20.0, 40.0));
        let quad = t.project_rect(&rect, &vp()).unwrap();
        assert!(is_axis_aligned(&quad));
        assert_relative_eq!(quad[0].x, 25.0, epsilon = 1e-3);
        assert_relative_eq!(quad[2].y, 27.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rotated_rect_is_not_axis_aligned() {
        let t = Transform::orthographic(200.0, 200.0)
            .pre_transform(&Transform3D::rotation(0.0, 0.0, 1.0, Angle::degrees(30.0)));
        let rect = Box2D::new(point2(10.0, 10.0), point2(20.0, 40.0));
        let quad = t.project_rect(&rect, &vp()).unwrap();
        assert!(!is_axis_aligned(&quad));
    }

    #[test]
    fn test_quarter_turn_is_axis_aligned() {
        let t = Transform::orthographic(200.0, 200.0)
            .pre_transform(&Transform3D::rotation(0.0, 0.0, 1.0, Angle::degrees(90.0)));
        let rect = Box2D::new(point2(10.0, -40.0), point2(20.0, -10.0));
        let quad = t.project_rect(&rect, &vp()).unwrap();
        assert!(is_axis_aligned(&quad));
    }
}
