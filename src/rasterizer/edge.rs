//! Fixed-point half-edge scan conversion
//!
//! Each directed edge of the triangle gets an integer edge function that is
//! positive on the interior side. Vertices are snapped to a sub-pixel grid so
//! that two triangles sharing an edge evaluate exactly the same values along
//! it, and a one-unit bias on top and left edges assigns pixels lying exactly
//! on an edge to one triangle only.
//!
//! Based on the half-space rasterizer described at
//! <https://web.archive.org/web/20050408192410/http://sw-shader.sourceforge.net/rasterizer.html>

use super::math::Vec3;
use super::types::Bounds;

/// Fractional bits of a [`Fixed`] coordinate (16 sub-pixel steps per pixel)
pub const SUBPIXEL_BITS: u32 = 4;

/// One pixel in fixed-point units
pub const SUBPIXEL_ONE: i64 = 1 << SUBPIXEL_BITS;

/// Largest screen coordinate (in pixels) accepted for scan conversion.
///
/// Vertices far off-target are common for large faces close to the camera.
/// At this bound a snapped coordinate needs 45 bits, so edge products stay
/// inside `i128`.
pub const MAX_SCREEN_COORD: f64 = (1u64 << 40) as f64;

/// Screen coordinate with [`SUBPIXEL_BITS`] fractional bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i64);

impl Fixed {
    /// Snap a pixel-space coordinate to the sub-pixel grid, rounding half away
    /// from zero. `None` for non-finite or out-of-range input.
    pub fn from_f64(v: f64) -> Option<Self> {
        if !v.is_finite() || v.abs() > MAX_SCREEN_COORD {
            return None;
        }
        Some(Fixed((v * SUBPIXEL_ONE as f64).round() as i64))
    }

    /// Centre of integer pixel `p`
    pub fn pixel_center(p: i64) -> Self {
        Fixed(p * SUBPIXEL_ONE + SUBPIXEL_ONE / 2)
    }

    pub fn raw(self) -> i64 {
        self.0
    }
}

/// Whether a screen-space point can be snapped to the sub-pixel grid
pub fn in_fixed_range(v: Vec3) -> bool {
    Fixed::from_f64(v.x).is_some() && Fixed::from_f64(v.y).is_some()
}

/// Fixed-point screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FixedPoint {
    x: i128,
    y: i128,
}

impl FixedPoint {
    fn from_screen(v: Vec3) -> Option<Self> {
        Some(Self {
            x: Fixed::from_f64(v.x)?.raw().into(),
            y: Fixed::from_f64(v.y)?.raw().into(),
        })
    }
}

/// Edge function of the directed edge `from -> to`
///
/// `E(p) = dx * (p.y - from.y) - dy * (p.x - from.x)` with
/// `dx = from.x - to.x`, `dy = from.y - to.y`.
#[derive(Debug, Clone, Copy)]
struct HalfEdge {
    from: FixedPoint,
    dx: i128,
    dy: i128,
    /// 1 on top and left edges, 0 otherwise
    bias: i128,
}

impl HalfEdge {
    fn new(from: FixedPoint, to: FixedPoint) -> Self {
        let dx = from.x - to.x;
        let dy = from.y - to.y;
        // Top-left fill convention: pixels exactly on these edges are inside
        let top_left = dy < 0 || (dy == 0 && dx > 0);
        Self { from, dx, dy, bias: top_left as i128 }
    }

    /// Unbiased edge value; twice the signed area of (from, to, p)
    fn value(&self, x: i128, y: i128) -> i128 {
        self.dx * (y - self.from.y) - self.dy * (x - self.from.x)
    }

    /// Edge value with the fill-convention bias applied
    fn at(&self, x: i128, y: i128) -> i128 {
        self.value(x, y) + self.bias
    }

    /// Value change for one pixel step to the right
    fn step_x(&self) -> i128 {
        -self.dy * i128::from(SUBPIXEL_ONE)
    }

    /// Value change for one pixel step down
    fn step_y(&self) -> i128 {
        self.dx * i128::from(SUBPIXEL_ONE)
    }
}

/// Coverage test for one triangle
#[derive(Debug, Clone)]
pub struct EdgeRasterizer {
    edges: [HalfEdge; 3],
}

impl EdgeRasterizer {
    /// Set up the three half-edges of a screen-space triangle
    ///
    /// Either winding is accepted; a clockwise triangle is walked in reverse
    /// so that edge values are positive inside. Returns `None` when the
    /// snapped triangle has zero area or a vertex cannot be represented in
    /// fixed point.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let a = FixedPoint::from_screen(a)?;
        let mut b = FixedPoint::from_screen(b)?;
        let mut c = FixedPoint::from_screen(c)?;

        let area = HalfEdge::new(a, b).value(c.x, c.y);
        if area == 0 {
            return None;
        }
        if area < 0 {
            std::mem::swap(&mut b, &mut c);
        }

        Some(Self {
            edges: [HalfEdge::new(a, b), HalfEdge::new(b, c), HalfEdge::new(c, a)],
        })
    }

    /// Whether the centre of pixel (x, y) is inside the triangle
    pub fn covers(&self, x: i64, y: i64) -> bool {
        let px = i128::from(Fixed::pixel_center(x).raw());
        let py = i128::from(Fixed::pixel_center(y).raw());
        self.edges.iter().all(|e| e.at(px, py) > 0)
    }

    /// Visit every covered pixel inside `bounds`, row by row
    ///
    /// Rows and columns outside the `width` x `height` target are never
    /// evaluated. Edge values are stepped incrementally, one add per edge per
    /// pixel.
    pub fn for_each_covered<F>(&self, bounds: Bounds, width: usize, height: usize, mut visit: F)
    where
        F: FnMut(usize, usize),
    {
        let top = bounds.top.max(0);
        let left = bounds.left.max(0);
        let bottom = bounds.bottom.min(height as i64 - 1);
        let right = bounds.right.min(width as i64 - 1);
        if bottom < top || right < left {
            return;
        }

        let ox = i128::from(Fixed::pixel_center(left).raw());
        let oy = i128::from(Fixed::pixel_center(top).raw());
        let [e1, e2, e3] = &self.edges;
        let (sx1, sx2, sx3) = (e1.step_x(), e2.step_x(), e3.step_x());
        let (sy1, sy2, sy3) = (e1.step_y(), e2.step_y(), e3.step_y());

        let mut cy1 = e1.at(ox, oy);
        let mut cy2 = e2.at(ox, oy);
        let mut cy3 = e3.at(ox, oy);

        for y in top..=bottom {
            let mut cx1 = cy1;
            let mut cx2 = cy2;
            let mut cx3 = cy3;

            for x in left..=right {
                if cx1 > 0 && cx2 > 0 && cx3 > 0 {
                    visit(x as usize, y as usize);
                }
                cx1 += sx1;
                cx2 += sx2;
                cx3 += sx3;
            }

            cy1 += sy1;
            cy2 += sy2;
            cy3 += sy3;
        }
    }
}
