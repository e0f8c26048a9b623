// MIT/Apache2 License

use crate::Result;
use chalkclip_geometry::{FillRule, LocalRect, Mesh, Path, Triangle};

/// Tolerance used when flattening curves, in local units.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// An arbitrary silhouette that can be used as a clip shape.
///
/// Primitives are immutable once built and are usually shared between clip
/// entries through an `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    mesh: Mesh,
    bounds: LocalRect,
}

impl Primitive {
    /// Create a primitive from an already tessellated mesh.
    pub fn from_mesh(mesh: Mesh) -> Self {
        let bounds = mesh.bounds();
        Primitive { mesh, bounds }
    }

    /// Create a primitive from non-overlapping triangles.
    pub fn from_triangles<I: IntoIterator<Item = Triangle<f32>>>(triangles: I) -> Self {
        Self::from_mesh(Mesh::from_triangles(triangles))
    }

    /// Create a primitive covering the interior of a path, using the
    /// non-zero fill rule.
    #[inline]
    pub fn fill_path(path: &Path) -> Result<Self> {
        Self::fill_path_with(path, FillRule::NonZero, DEFAULT_TOLERANCE)
    }

    /// Create a primitive covering the interior of a path.
    pub fn fill_path_with(path: &Path, rule: FillRule, tolerance: f32) -> Result<Self> {
        let mesh = Mesh::fill_path(path, rule, tolerance)?;
        Ok(Self::from_mesh(mesh))
    }

    /// The triangles making up this silhouette.
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The local-space bounding box of this silhouette.
    #[inline]
    pub fn bounds(&self) -> LocalRect {
        self.bounds
    }
}
