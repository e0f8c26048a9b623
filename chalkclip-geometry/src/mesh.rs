// BSL 1.0 License

use super::{LocalRect, Point2D, Triangle};
use euclid::{default::Box2D, point2};
use lyon_path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, TessellationError,
    VertexBuffers,
};
use tinyvec::TinyVec;

/// Most meshes we see are rectangles, which fit inline.
const INLINE_VERTICES: usize = 8;
const INLINE_INDICES: usize = 12;

/// A set of non-overlapping triangles in local space.
///
/// Every point inside the shape is covered by exactly one triangle, which is
/// what allows the stencil buffer to count coverage with `INCR`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: TinyVec<[Point2D<f32>; INLINE_VERTICES]>,
    indices: TinyVec<[u32; INLINE_INDICES]>,
}

impl Mesh {
    /// A mesh of two triangles covering a rectangle.
    #[must_use]
    pub fn rectangle(rect: &LocalRect) -> Self {
        let mut mesh = Mesh::default();
        mesh.vertices.extend([
            rect.min,
            point2(rect.max.x, rect.min.y),
            rect.max,
            point2(rect.min.x, rect.max.y),
        ]);
        mesh.indices.extend([0, 1, 2, 0, 2, 3]);
        mesh
    }

    /// Build a mesh from a list of triangles.
    ///
    /// The caller is responsible for the triangles not overlapping.
    pub fn from_triangles<I: IntoIterator<Item = Triangle<f32>>>(triangles: I) -> Self {
        let mut mesh = Mesh::default();
        for Triangle { a, b, c } in triangles {
            // indices are stored as u32; a mesh that large is not a clip shape
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend([a, b, c]);
            mesh.indices.extend([base, base + 1, base + 2]);
        }
        mesh
    }

    /// Tessellate the filled interior of a path.
    ///
    /// # Errors
    ///
    /// Fails if the tessellator cannot handle the path.
    pub fn fill_path(path: &Path, rule: FillRule, tolerance: f32) -> Result<Self, TessellationError> {
        let mut buffers: VertexBuffers<Point2D<f32>, u32> = VertexBuffers::new();
        let options = FillOptions::tolerance(tolerance).with_fill_rule(rule);

        FillTessellator::new().tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| vertex.position()),
        )?;

        let mut mesh = Mesh::default();
        mesh.vertices.extend(buffers.vertices);
        mesh.indices.extend(buffers.indices);
        Ok(mesh)
    }

    /// The number of triangles in this mesh.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len() / 3
    }

    /// Does this mesh cover nothing?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// The vertices of this mesh.
    #[must_use]
    pub fn vertices(&self) -> &[Point2D<f32>] {
        &self.vertices
    }

    /// The triangle list indices of this mesh.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Iterate over the triangles of this mesh.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle<f32>> + '_ {
        self.indices.chunks_exact(3).map(move |tri| Triangle {
            a: self.vertices[tri[0] as usize],
            b: self.vertices[tri[1] as usize],
            c: self.vertices[tri[2] as usize],
        })
    }

    /// The local-space bounding box of this mesh.
    #[must_use]
    pub fn bounds(&self) -> LocalRect {
        Box2D::from_points(self.vertices.iter().copied())
    }
}
