//! Per-pixel shading
//!
//! A shader writes RGB into a pixel that already passed the depth test. Alpha
//! is forced to 255 before the call; a shader may still change it.
//! Shaders are looked up by name in a [`ShaderRegistry`].

use std::collections::HashMap;

use super::error::{RenderError, Result};
use super::math::Vec3;
use super::types::Color;

/// Shading function
pub trait Shader: Send + Sync {
    /// * `color` - the RGBA pixel being written
    /// * `position` - reconstructed world position (z is the corrected depth)
    /// * `face_attributes` - attributes shared by the whole triangle
    /// * `vertex_attributes` - per-vertex attributes interpolated at this pixel
    fn shade(&self, color: &mut [u8; 4], position: Vec3, face_attributes: &[f64], vertex_attributes: &[f64]);
}

impl<F> Shader for F
where
    F: Fn(&mut [u8; 4], Vec3, &[f64], &[f64]) + Send + Sync,
{
    fn shade(&self, color: &mut [u8; 4], position: Vec3, face_attributes: &[f64], vertex_attributes: &[f64]) {
        self(color, position, face_attributes, vertex_attributes)
    }
}

/// Constant color
#[derive(Debug, Clone, Copy)]
pub struct SolidColor(pub Color);

impl Shader for SolidColor {
    fn shade(&self, color: &mut [u8; 4], _: Vec3, _: &[f64], _: &[f64]) {
        color[0] = self.0.r;
        color[1] = self.0.g;
        color[2] = self.0.b;
    }
}

/// Two-tone checkerboard over the first two vertex attributes (u, v)
#[derive(Debug, Clone, Copy)]
pub struct Checkerboard {
    pub dark: Color,
    pub light: Color,
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self {
            dark: Color::new(30, 90, 180),
            light: Color::new(230, 245, 250),
        }
    }
}

impl Shader for Checkerboard {
    fn shade(&self, color: &mut [u8; 4], _: Vec3, _: &[f64], vertex_attributes: &[f64]) {
        let u = vertex_attributes.first().copied().unwrap_or(0.0);
        let v = vertex_attributes.get(1).copied().unwrap_or(0.0);
        let odd_u = (u % 1.0).abs() > 0.5;
        let odd_v = (v % 1.0).abs() > 0.5;
        let c = if odd_u ^ odd_v { self.dark } else { self.light };
        color[0] = c.r;
        color[1] = c.g;
        color[2] = c.b;
    }
}

/// RGB straight from the first three vertex attributes, in 0.0-1.0
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexColor;

impl Shader for VertexColor {
    fn shade(&self, color: &mut [u8; 4], _: Vec3, _: &[f64], vertex_attributes: &[f64]) {
        let channel = |i: usize| vertex_attributes.get(i).copied().unwrap_or(0.0);
        let c = Color::from_unit(channel(0), channel(1), channel(2));
        color[0] = c.r;
        color[1] = c.g;
        color[2] = c.b;
    }
}

/// Lambert lighting of a face normal stored in face attributes 0..3
#[derive(Debug, Clone, Copy)]
pub struct FlatLit {
    pub base: Color,
    pub light_dir: Vec3,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f64,
}

impl Default for FlatLit {
    fn default() -> Self {
        Self {
            base: Color::WHITE,
            light_dir: Vec3::new(-1.0, -1.0, -1.0).normalize(),
            ambient: 0.3,
        }
    }
}

impl FlatLit {
    fn intensity(&self, normal: Vec3) -> f64 {
        // Light travels along light_dir, so surfaces facing against it are lit
        let diffuse = normal.normalize().dot(-self.light_dir).max(0.0);
        (self.ambient + (1.0 - self.ambient) * diffuse).clamp(0.0, 1.0)
    }
}

impl Shader for FlatLit {
    fn shade(&self, color: &mut [u8; 4], _: Vec3, face_attributes: &[f64], _: &[f64]) {
        let shade = if face_attributes.len() >= 3 {
            self.intensity(Vec3::from_slice(face_attributes))
        } else {
            1.0
        };
        let c = self.base.shade(shade);
        color[0] = c.r;
        color[1] = c.g;
        color[2] = c.b;
    }
}

/// Grayscale by depth: white at depth 1 or nearer, fading as 1/z
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthGray;

impl Shader for DepthGray {
    fn shade(&self, color: &mut [u8; 4], position: Vec3, _: &[f64], _: &[f64]) {
        let g = Color::from_unit(1.0 / position.z, 1.0 / position.z, 1.0 / position.z);
        color[0] = g.r;
        color[1] = g.g;
        color[2] = g.b;
    }
}

/// Name-keyed table of shaders
pub struct ShaderRegistry {
    shaders: HashMap<String, Box<dyn Shader>>,
}

impl ShaderRegistry {
    /// Registry with no shaders
    pub fn empty() -> Self {
        Self { shaders: HashMap::new() }
    }

    /// Registry holding the built-in shaders: `test`, `solid`, `vertex_color`,
    /// `flat` and `depth`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("test", Checkerboard::default());
        registry.register("solid", SolidColor(Color::WHITE));
        registry.register("vertex_color", VertexColor);
        registry.register("flat", FlatLit::default());
        registry.register("depth", DepthGray);
        registry
    }

    /// Insert a shader, replacing any existing one with the same name
    pub fn register<S: Shader + 'static>(&mut self, name: impl Into<String>, shader: S) {
        let name = name.into();
        if self.shaders.insert(name.clone(), Box::new(shader)).is_some() {
            log::debug!("Replaced shader `{}`", name);
        } else {
            log::debug!("Registered shader `{}`", name);
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Shader> {
        self.shaders
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| RenderError::UnknownShader(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shaders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderRegistry").field("shaders", &self.names()).finish()
    }
}
