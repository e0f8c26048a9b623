// MIT/Apache2 License

//! A software render target with a colour buffer and a stencil buffer.

use crate::{Primitive, Rasterizer, Result, ScissorRect, StencilDraw, StencilFunc, StencilOp};
use chalkclip_geometry::{
    point2, Box2D, DeviceBox, LocalRect, Mesh, Point2D, Transform, Triangle, Viewport,
};
use std::cmp;

/// Sub-pixel precision of the rasterizer, in bits.
const SUBPIXEL_BITS: u32 = 8;
const SUBPIXEL: f32 = (1 << SUBPIXEL_BITS) as f32;
const HALF_PIXEL: i64 = 1 << (SUBPIXEL_BITS - 1);

/// Vertices further out than this are clamped, which keeps the edge
/// functions from overflowing.
const COORD_LIMIT: f32 = (1 << 20) as f32;

/// The color drawn by `draw_rectangle` and `draw_primitive` when color writes
/// are enabled.
const DEFAULT_PAINT: u32 = 0xFFFF_FFFF;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct StencilState {
    test: bool,
    func: StencilFunc,
    reference: u8,
    mask: u8,
    op: StencilOp,
    write_mask: u8,
}

impl Default for StencilState {
    fn default() -> Self {
        StencilState {
            test: false,
            func: StencilFunc::Always,
            reference: 0,
            mask: !0,
            op: StencilOp::Keep,
            write_mask: !0,
        }
    }
}

/// A CPU render target.
///
/// Colors are packed `0xRRGGBBAA` values. Triangles are rasterized with
/// fixed-point edge functions and sampled at pixel centers, so triangles
/// that share an edge never both touch the same pixel.
#[derive(Debug, Clone)]
pub struct SoftwareTarget {
    width: i32,
    height: i32,
    offscreen: bool,
    color: Vec<u32>,
    stencil: Vec<u8>,
    viewport: Viewport,
    generation: u64,
    transform: Transform,
    scissor: Option<ScissorRect>,
    state: StencilState,
    color_write: bool,
    paint: u32,
    draw_calls: usize,
}

impl SoftwareTarget {
    /// Create an onscreen target. The scissor rectangle is interpreted with
    /// its origin at the bottom left.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_orientation(width, height, false)
    }

    /// Create an offscreen target. The scissor rectangle is interpreted with
    /// its origin at the top left.
    pub fn new_offscreen(width: i32, height: i32) -> Self {
        Self::with_orientation(width, height, true)
    }

    fn with_orientation(width: i32, height: i32, offscreen: bool) -> Self {
        let width = cmp::max(width, 0);
        let height = cmp::max(height, 0);
        let len = width as usize * height as usize;

        SoftwareTarget {
            width,
            height,
            offscreen,
            color: vec![0; len],
            stencil: vec![0; len],
            viewport: Viewport::new(0.0, 0.0, width as f32, height as f32),
            generation: 0,
            transform: Transform::orthographic(width as f32, height as f32),
            scissor: None,
            state: StencilState::default(),
            color_write: true,
            paint: DEFAULT_PAINT,
            draw_calls: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Change the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Set the color `draw_rectangle` and `draw_primitive` draw with.
    #[inline]
    pub fn set_paint(&mut self, color: u32) {
        self.paint = color;
    }

    /// Draw `color` over the whole target, subject to the scissor and
    /// stencil tests.
    pub fn fill(&mut self, color: u32) {
        let (w, h) = (self.width as f32, self.height as f32);
        let corners = [point2(0.0, 0.0), point2(w, 0.0), point2(w, h), point2(0.0, h)];
        self.rasterize_quad(&corners, color);
        self.draw_calls += 1;
    }

    /// Draw `color` over a rectangle under the current transform, subject to
    /// the scissor and stencil tests.
    pub fn fill_rect(&mut self, rect: LocalRect, color: u32) {
        self.draw_mesh(&Mesh::rectangle(&rect), color);
        self.draw_calls += 1;
    }

    /// The color at a pixel, or `None` if it is outside of the target.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// The stencil value at a pixel, or `None` if it is outside of the
    /// target.
    #[inline]
    pub fn stencil_value(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.stencil[i])
    }

    /// The number of pixels with the given color.
    #[inline]
    pub fn count_pixels(&self, color: u32) -> usize {
        self.color.iter().filter(|&&c| c == color).count()
    }

    /// The number of draws that reached the target so far.
    #[inline]
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// The colour buffer, row by row from the top.
    #[inline]
    pub fn colors(&self) -> &[u32] {
        &self.color
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    /// The pixels ordinary draws may touch, in device space.
    fn write_region(&self) -> DeviceBox {
        let target = Box2D::new(point2(0, 0), point2(self.width, self.height));
        match self.scissor {
            None => target,
            Some(s) => {
                let y0 = if self.offscreen {
                    s.y
                } else {
                    self.height.saturating_sub(s.y.saturating_add(s.height))
                };
                let scissor = Box2D::new(
                    point2(s.x, y0),
                    point2(s.x.saturating_add(s.width), y0.saturating_add(s.height)),
                );
                target.intersection_unchecked(&scissor)
            }
        }
    }

    fn draw_mesh(&mut self, mesh: &Mesh, color: u32) {
        let transform = self.transform;
        let viewport = self.viewport;

        for Triangle { a, b, c } in mesh.triangles() {
            let projected = (
                transform.project_point(a, &viewport),
                transform.project_point(b, &viewport),
                transform.project_point(c, &viewport),
            );
            match projected {
                (Some(a), Some(b), Some(c)) => self.rasterize_triangle([a, b, c], color),
                _ => log::warn!("Skipping triangle that reaches behind the eye"),
            }
        }
    }

    fn rasterize_quad(&mut self, corners: &[Point2D<f32>; 4], color: u32) {
        self.rasterize_triangle([corners[0], corners[1], corners[2]], color);
        self.rasterize_triangle([corners[0], corners[2], corners[3]], color);
    }

    fn rasterize_triangle(&mut self, points: [Point2D<f32>; 3], color: u32) {
        let [mut a, mut b, c] = points.map(to_fixed);

        let area = orient(a, b, c);
        if area == 0 {
            return;
        }
        if area < 0 {
            std::mem::swap(&mut a, &mut b);
        }
        let edges = [(a, b), (b, c), (c, a)];

        let region = self.write_region();
        let min_x = cmp::max(region.min.x as i64, (a.0.min(b.0).min(c.0) >> SUBPIXEL_BITS) - 1);
        let max_x = cmp::min(region.max.x as i64, (a.0.max(b.0).max(c.0) >> SUBPIXEL_BITS) + 2);
        let min_y = cmp::max(region.min.y as i64, (a.1.min(b.1).min(c.1) >> SUBPIXEL_BITS) - 1);
        let max_y = cmp::min(region.max.y as i64, (a.1.max(b.1).max(c.1) >> SUBPIXEL_BITS) + 2);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let center = (
                    (px << SUBPIXEL_BITS) + HALF_PIXEL,
                    (py << SUBPIXEL_BITS) + HALF_PIXEL,
                );
                if edges.iter().all(|&(from, to)| covers(from, to, center)) {
                    self.shade(px as i32, py as i32, color);
                }
            }
        }
    }

    fn shade(&mut self, x: i32, y: i32, color: u32) {
        let i = match self.index(x, y) {
            Some(i) => i,
            None => return,
        };

        if self.state.test {
            let StencilState {
                func,
                reference,
                mask,
                op,
                write_mask,
                ..
            } = self.state;
            let value = self.stencil[i];
            let passed = func.passes(reference, mask, value);
            self.stencil[i] = op.apply(value, reference, write_mask);
            if !passed {
                return;
            }
        }

        if self.color_write {
            self.color[i] = color;
        }
    }
}

fn to_fixed(pt: Point2D<f32>) -> (i64, i64) {
    let fix = |v: f32| (v.max(-COORD_LIMIT).min(COORD_LIMIT) * SUBPIXEL).round() as i64;
    (fix(pt.x), fix(pt.y))
}

/// Twice the signed area of the triangle `a, b, p`. Positive when `p` is on
/// the clockwise side of `a -> b` in device space, where Y points down.
#[inline]
fn orient(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> i64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Is `p` on the inner side of the edge `from -> to`?
///
/// Points exactly on the edge belong to it only for edges heading down, or
/// heading left along a row. An edge shared by two triangles is walked in
/// opposite directions by each, so exactly one of them gets the point.
#[inline]
fn covers(from: (i64, i64), to: (i64, i64), p: (i64, i64)) -> bool {
    let w = orient(from, to, p);
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    w > 0 || (w == 0 && (dy > 0 || (dy == 0 && dx < 0)))
}

impl Rasterizer for SoftwareTarget {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn viewport_generation(&self) -> u64 {
        self.generation
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_offscreen(&self) -> bool {
        self.offscreen
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_scissor(&mut self, scissor: Option<ScissorRect>) -> Result {
        self.scissor = scissor;
        Ok(())
    }

    fn set_stencil_test(&mut self, enabled: bool) -> Result {
        self.state.test = enabled;
        Ok(())
    }

    fn set_stencil_func(&mut self, func: StencilFunc, reference: u8, mask: u8) -> Result {
        self.state.func = func;
        self.state.reference = reference;
        self.state.mask = mask;
        Ok(())
    }

    fn set_stencil_op(&mut self, op: StencilOp) -> Result {
        self.state.op = op;
        Ok(())
    }

    fn set_stencil_write_mask(&mut self, mask: u8) -> Result {
        self.state.write_mask = mask;
        Ok(())
    }

    fn set_write_masks(&mut self, color: bool, _depth: bool) -> Result {
        // no depth buffer
        self.color_write = color;
        Ok(())
    }

    fn clear_stencil(&mut self, value: u8) -> Result {
        let region = self.write_region();
        let write_mask = self.state.write_mask;

        for y in region.min.y..region.max.y {
            for x in region.min.x..region.max.x {
                if let Some(i) = self.index(x, y) {
                    self.stencil[i] = StencilOp::Replace.apply(self.stencil[i], value, write_mask);
                }
            }
        }
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: LocalRect) -> Result {
        let paint = self.paint;
        self.fill_rect(rect, paint);
        Ok(())
    }

    fn draw_primitive(&mut self, primitive: &Primitive) -> Result {
        let paint = self.paint;
        self.draw_mesh(primitive.mesh(), paint);
        self.draw_calls += 1;
        Ok(())
    }
}

impl StencilDraw for SoftwareTarget {}
