//! Barycentric weights and perspective-correct attribute interpolation

use super::math::{edge_function, Vec3};
use super::types::{AttributeMode, Triangle};

/// Weights of the three vertices at one pixel, summing to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Barycentric {
    pub fn as_array(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// Per-triangle interpolation state
///
/// Weights are signed sub-areas over the signed total area, so they come out
/// positive inside the triangle for either winding.
#[derive(Debug, Clone)]
pub struct Interpolator<'t> {
    /// Projected vertices in normalized device coordinates
    ndc: [Vec3; 3],
    area: f64,
    inv_z: [f64; 3],
    /// World x/z and y/z of each vertex
    world_over_z: [(f64, f64); 3],
    attributes: [&'t [f64]; 3],
    mode: AttributeMode,
}

impl<'t> Interpolator<'t> {
    /// `None` when the projected triangle has no area to normalize by
    ///
    /// The triangle is expected to have passed `Triangle::validate`.
    pub fn new(triangle: &Triangle<'t>, mode: AttributeMode) -> Option<Self> {
        let [a, b, c] = triangle.projected;
        let area = edge_function(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return None;
        }

        let inv_z = triangle.world.map(|w| 1.0 / w.z);
        let world_over_z = triangle.world.map(|w| (w.x / w.z, w.y / w.z));

        Some(Self {
            ndc: triangle.projected,
            area,
            inv_z,
            world_over_z,
            attributes: triangle.vertex_attributes,
            mode,
        })
    }

    /// Barycentric weights of a point given in device coordinates
    pub fn weights(&self, p: Vec3) -> Barycentric {
        let [a, b, c] = self.ndc;
        Barycentric {
            a: edge_function(b, c, p) / self.area,
            b: edge_function(c, a, p) / self.area,
            c: edge_function(a, b, p) / self.area,
        }
    }

    /// Perspective-corrected depth: `1 / (wa/za + wb/zb + wc/zc)`
    ///
    /// `None` where the reciprocal sum vanishes, which only happens for
    /// triangles whose vertices straddle the camera plane.
    pub fn depth(&self, w: &Barycentric) -> Option<f64> {
        let inv = w.a * self.inv_z[0] + w.b * self.inv_z[1] + w.c * self.inv_z[2];
        let z = 1.0 / inv;
        if inv == 0.0 || !z.is_finite() {
            return None;
        }
        Some(z)
    }

    /// World-space position of the pixel, reconstructed from depth-weighted x/y
    pub fn world_position(&self, w: &Barycentric, z: f64) -> Vec3 {
        let ws = w.as_array();
        let mut x = 0.0;
        let mut y = 0.0;
        for (weight, (xz, yz)) in ws.iter().zip(self.world_over_z.iter()) {
            x += weight * xz;
            y += weight * yz;
        }
        Vec3::new(x * z, y * z, z)
    }

    /// Blend the per-vertex attributes into `out`
    ///
    /// `out` must be as long as the triangle's attribute vectors.
    pub fn attributes(&self, w: &Barycentric, z: f64, out: &mut [f64]) {
        let ws = w.as_array();
        let scale = match self.mode {
            AttributeMode::Perspective => [ws[0] * self.inv_z[0], ws[1] * self.inv_z[1], ws[2] * self.inv_z[2]],
            AttributeMode::PreDivided | AttributeMode::Affine => ws,
        };
        let rescale = match self.mode {
            AttributeMode::Affine => 1.0,
            AttributeMode::Perspective | AttributeMode::PreDivided => z,
        };

        for (element, slot) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for vertex in 0..3 {
                sum += self.attributes[vertex][element] * scale[vertex];
            }
            *slot = sum * rescale;
        }
    }
}
