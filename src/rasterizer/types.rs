//! Core types for the rasterizer

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use super::error::{RenderError, Result};
use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from unit-range channels, clamping out-of-range values
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(c(r), c(g), c(b))
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    pub fn shade(self, intensity: f64) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f64 * i) as u8,
            g: (self.g as f64 * i) as u8,
            b: (self.b as f64 * i) as u8,
            a: self.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::with_alpha(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// How normalized device x maps onto pixel columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectMode {
    /// [-1, 1] spans the full width and the full height
    #[default]
    Stretch,
    /// x is divided by width/height so one NDC unit covers the same number
    /// of pixels on both axes
    Corrected,
}

/// How per-vertex attributes are blended across the triangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeMode {
    /// Attributes are raw; the rasterizer divides them by vertex depth and
    /// rescales by the corrected pixel depth
    #[default]
    Perspective,
    /// Attributes were already divided by vertex depth by the caller; only
    /// the rescale by the corrected pixel depth is applied
    PreDivided,
    /// Plain screen-space blend (PS1-style warping)
    Affine,
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterSettings {
    #[serde(default)]
    pub aspect: AspectMode,
    #[serde(default)]
    pub attributes: AttributeMode,
    /// Color used by `Framebuffer::clear` between frames
    #[serde(default = "default_clear_color")]
    pub clear_color: Color,
}

fn default_clear_color() -> Color {
    Color::TRANSPARENT
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            aspect: AspectMode::Stretch,
            attributes: AttributeMode::Perspective,
            clear_color: default_clear_color(),
        }
    }
}

/// One triangle ready for rasterization
///
/// `world` positions are post-model, pre-projection (z is view depth).
/// `projected` positions are post perspective-divide, x/y in [-1, 1].
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    pub world: [Vec3; 3],
    pub projected: [Vec3; 3],
    pub face_attributes: &'a [f64],
    pub vertex_attributes: [&'a [f64]; 3],
}

impl<'a> Triangle<'a> {
    pub fn new(
        world: [Vec3; 3],
        projected: [Vec3; 3],
        face_attributes: &'a [f64],
        vertex_attributes: [&'a [f64]; 3],
    ) -> Self {
        Self { world, projected, face_attributes, vertex_attributes }
    }

    /// Build from the flat `[x, y, z] * 3` layout used across the render boundary
    pub fn from_flat(
        world: &[f64; 9],
        projected: &[f64; 9],
        face_attributes: &'a [f64],
        vertex_attributes: [&'a [f64]; 3],
    ) -> Self {
        let split = |v: &[f64; 9]| {
            [
                Vec3::from_slice(&v[0..3]),
                Vec3::from_slice(&v[3..6]),
                Vec3::from_slice(&v[6..9]),
            ]
        };
        Self::new(split(world), split(projected), face_attributes, vertex_attributes)
    }

    /// Length shared by all three per-vertex attribute vectors
    pub fn attribute_len(&self) -> usize {
        self.vertex_attributes[0].len()
    }

    /// Check the contract the rasterizer relies on: equal attribute lengths
    /// and a defined reciprocal depth on every vertex
    pub fn validate(&self) -> Result<()> {
        let expected = self.attribute_len();
        for (vertex, attrs) in self.vertex_attributes.iter().enumerate() {
            if attrs.len() != expected {
                return Err(RenderError::AttributeLength { vertex, expected, actual: attrs.len() });
            }
        }
        for (vertex, w) in self.world.iter().enumerate() {
            if w.z == 0.0 {
                return Err(RenderError::ZeroDepth { vertex });
            }
            if !w.z.is_finite() || !w.z.recip().is_finite() {
                return Err(RenderError::InvalidDepth { vertex, depth: w.z });
            }
        }
        Ok(())
    }
}

/// Inclusive pixel-space rectangle, clamped to [0, width] x [0, height]
///
/// Empty when `bottom < top` or `right < left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.bottom < self.top || self.right < self.left
    }
}

/// Per-call pixel counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Pixels inside the triangle after the fill convention
    pub covered: usize,
    /// Covered pixels that won the depth test and were shaded
    pub shaded: usize,
}

impl AddAssign for RasterStats {
    fn add_assign(&mut self, other: Self) {
        self.covered += other.covered;
        self.shaded += other.shaded;
    }
}
