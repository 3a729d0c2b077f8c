//! 4x4 matrices
//!
//! Row-vector convention: a point `[x, y, z, 1]` is multiplied on the left,
//! so translation lives in the bottom row and `a.mul(&b)` applies `a` first.

use crate::rasterizer::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [[f64; 4]; 4]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Perspective projection looking down +z
    ///
    /// Maps view depth `near` to 0 and `far` to 1, and puts the view depth in
    /// w so `transform_point` performs the perspective divide.
    pub fn perspective(fov_degrees: f64, near: f64, far: f64) -> Self {
        let scale = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
        let mut m = [[0.0; 4]; 4];
        m[0][0] = scale;
        m[1][1] = scale;
        m[2][2] = far / (far - near);
        m[3][2] = -far * near / (far - near);
        m[2][3] = 1.0;
        Mat4(m)
    }

    /// Euler rotation in radians, composed as Rx * Ry * Rz
    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        let (sx, cx) = x.sin_cos();
        let (sy, cy) = y.sin_cos();
        let (sz, cz) = z.sin_cos();

        let rx = Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cx, -sx, 0.0],
            [0.0, sx, cx, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let ry = Mat4([
            [cy, 0.0, sy, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sy, 0.0, cy, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let rz = Mat4([
            [cz, -sz, 0.0, 0.0],
            [sz, cz, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        rx.mul(&ry).mul(&rz)
    }

    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.0[3][0] = t.x;
        m.0[3][1] = t.y;
        m.0[3][2] = t.z;
        m
    }

    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                for k in 0..4 {
                    *cell += self.0[i][k] * other.0[k][j];
                }
            }
        }
        Mat4(result)
    }

    /// Transform a point, dividing by w when w is not 1
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        let column = |j: usize| p.x * m[0][j] + p.y * m[1][j] + p.z * m[2][j] + m[3][j];
        let (x, y, z, w) = (column(0), column(1), column(2), column(3));
        if w == 1.0 || w == 0.0 {
            Vec3::new(x, y, z)
        } else {
            Vec3::new(x / w, y / w, z / w)
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
