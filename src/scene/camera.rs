//! Perspective camera

use serde::{Deserialize, Serialize};

use super::matrix::Mat4;
use crate::rasterizer::Vec3;

/// Camera looking down +z from `position`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in radians, applied to the world around the camera
    #[serde(default)]
    pub rotation: Vec3,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    /// Width over height; projected x is divided by it
    #[serde(default = "default_aspect")]
    pub aspect: f64,
}

fn default_aspect() -> f64 {
    1.0
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(70.0, 0.1, 1000.0)
    }
}

impl Camera {
    pub fn new(fov: f64, near: f64, far: f64) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov,
            near,
            far,
            aspect: default_aspect(),
        }
    }

    /// World to camera transform: translate by -position, then rotate
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::translation(-self.position).mul(&Mat4::rotation(
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ))
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.near, self.far)
    }

    /// Move a world point into camera space; z becomes view depth
    pub fn view(&self, v: Vec3) -> Vec3 {
        self.view_matrix().transform_point(v)
    }

    /// Project a camera-space point to normalized device coordinates
    pub fn project(&self, v: Vec3) -> Vec3 {
        let mut p = self.projection_matrix().transform_point(v);
        if self.aspect != 0.0 {
            p.x /= self.aspect;
        }
        p
    }

    /// Whether a view depth lies in front of the near plane
    pub fn in_front(&self, view_depth: f64) -> bool {
        view_depth > self.near
    }
}
