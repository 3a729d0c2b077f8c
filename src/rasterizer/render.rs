//! Triangle rendering
//!
//! Screen mapping, bounding box, fixed-point coverage, interpolation, depth
//! test and shader dispatch for one triangle at a time.

use super::bounds::bounding_box;
use super::coords::CoordinateMapper;
use super::depth::test_and_commit;
use super::edge::{in_fixed_range, EdgeRasterizer, MAX_SCREEN_COORD};
use super::error::Result;
use super::framebuffer::RenderTarget;
use super::interpolate::Interpolator;
use super::shader::{Shader, ShaderRegistry};
use super::types::{RasterSettings, RasterStats, Triangle};

/// Draws triangles into render targets with named shaders
#[derive(Debug, Default)]
pub struct Renderer {
    settings: RasterSettings,
    shaders: ShaderRegistry,
}

impl Renderer {
    /// Renderer with the built-in shaders registered
    pub fn new(settings: RasterSettings) -> Self {
        Self::with_registry(settings, ShaderRegistry::new())
    }

    pub fn with_registry(settings: RasterSettings, shaders: ShaderRegistry) -> Self {
        Self { settings, shaders }
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RasterSettings {
        &mut self.settings
    }

    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    /// Add or replace a shader; it can be referenced by later render calls
    pub fn register_shader<S: Shader + 'static>(&mut self, name: impl Into<String>, shader: S) {
        self.shaders.register(name, shader);
    }

    /// Rasterize one triangle into `target`
    ///
    /// Each covered pixel whose interpolated depth is strictly nearer than
    /// the stored depth gets its depth committed, alpha forced to 255 and the
    /// shader run once. Triangles that cannot be drawn (zero area, off
    /// target, not representable on the sub-pixel grid) draw nothing and
    /// return empty stats.
    ///
    /// # Errors
    ///
    /// `UnknownShader` for an unregistered name, `AttributeLength`,
    /// `ZeroDepth` and `InvalidDepth` for malformed triangles. Buffers are
    /// untouched on error.
    pub fn render(
        &self,
        target: &mut RenderTarget<'_>,
        triangle: &Triangle<'_>,
        shader_name: &str,
    ) -> Result<RasterStats> {
        let shader = self.shaders.get(shader_name)?;
        triangle.validate()?;

        let mut stats = RasterStats::default();
        let (width, height) = (target.width, target.height);

        let mapper = CoordinateMapper::new(width, height, self.settings.aspect);
        let [a, b, c] = triangle.projected.map(|v| mapper.world_to_screen(v));

        let bounds = bounding_box(a, b, c, width, height);
        if bounds.is_empty() {
            log::trace!("Triangle outside target, bounds {:?}", bounds);
            return Ok(stats);
        }

        let Some(raster) = EdgeRasterizer::new(a, b, c) else {
            if [a, b, c].into_iter().all(in_fixed_range) {
                log::debug!("Skipping degenerate triangle {:?}", triangle.projected);
            } else {
                log::debug!(
                    "Skipping triangle with a vertex beyond the fixed-point range of {} px: {:?}",
                    MAX_SCREEN_COORD,
                    [a, b, c]
                );
            }
            return Ok(stats);
        };
        let Some(interp) = Interpolator::new(triangle, self.settings.attributes) else {
            log::debug!("Skipping zero-area triangle {:?}", triangle.projected);
            return Ok(stats);
        };

        let mut pixel_attributes = vec![0.0; triangle.attribute_len()];
        let color = &mut *target.color;
        let depth = &mut *target.depth;

        raster.for_each_covered(bounds, width, height, |x, y| {
            stats.covered += 1;

            let weights = interp.weights(mapper.pixel_center(x, y));
            let Some(z) = interp.depth(&weights) else {
                return;
            };

            let index = y * width + x;
            if !test_and_commit(depth, index, z) {
                return;
            }

            interp.attributes(&weights, z, &mut pixel_attributes);
            let position = interp.world_position(&weights, z);

            let offset = index * 4;
            let Ok(pixel) = <&mut [u8; 4]>::try_from(&mut color[offset..offset + 4]) else {
                return;
            };
            pixel[3] = 255;
            shader.shade(pixel, position, triangle.face_attributes, &pixel_attributes);
            stats.shaded += 1;
        });

        log::trace!(
            "Rendered triangle with `{}`: {} covered, {} shaded",
            shader_name,
            stats.covered,
            stats.shaded
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::depth::FAR_DEPTH;
    use crate::rasterizer::framebuffer::Framebuffer;
    use crate::rasterizer::math::Vec3;
    use crate::rasterizer::shader::SolidColor;
    use crate::rasterizer::types::{AspectMode, Color};
    use crate::rasterizer::RenderError;

    /// Triangle at constant world depth `z`, projected as-is
    fn flat_triangle(points: [(f64, f64); 3], z: f64) -> Triangle<'static> {
        let p = points.map(|(x, y)| Vec3::new(x, y, z));
        Triangle::new(p, p, &[], [&[], &[], &[]])
    }

    fn renderer() -> Renderer {
        let mut r = Renderer::new(RasterSettings::default());
        r.register_shader("red", SolidColor(Color::RED));
        r.register_shader("green", SolidColor(Color::GREEN));
        r
    }

    #[test]
    fn test_full_target_triangle_sets_depth_and_alpha_everywhere() {
        let mut fb = Framebuffer::new(6, 4);
        let tri = flat_triangle([(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)], 2.5);
        let stats = renderer().render(&mut fb.target(), &tri, "red").unwrap();

        assert_eq!(stats, RasterStats { covered: 24, shaded: 24 });
        assert!(fb.zbuffer.iter().all(|&d| (d - 2.5).abs() < 1e-12));
        assert!(fb.pixels.chunks(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn test_example_triangle_in_4x4_target() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::TRANSPARENT);
        // Screen vertices (2, 2), (4, 2), (2, 4)
        let tri = flat_triangle([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], 1.0);
        let stats = renderer().render(&mut fb.target(), &tri, "green").unwrap();

        // Centres (2.5, 2.5), (3.5, 2.5) and (2.5, 3.5); the last two sit on
        // the hypotenuse, which is a bottom-right edge
        assert_eq!(stats.shaded, 1);
        assert_eq!(fb.pixel(2, 2), Some(Color::GREEN));
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (2, 2) {
                    assert_eq!(fb.pixel(x, y), Some(Color::TRANSPARENT));
                    assert_eq!(fb.depth(x, y), Some(FAR_DEPTH));
                }
            }
        }
    }

    #[test]
    fn test_unknown_shader_leaves_buffers_alone() {
        let mut fb = Framebuffer::new(4, 4);
        let tri = flat_triangle([(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)], 1.0);
        let err = renderer().render(&mut fb.target(), &tri, "nope").unwrap_err();
        assert_eq!(err, RenderError::UnknownShader("nope".to_string()));
        assert!(fb.pixels.iter().all(|&b| b == 0));
        assert!(fb.zbuffer.iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let mut fb = Framebuffer::new(4, 4);
        let tri = flat_triangle([(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)], 0.0);
        let err = renderer().render(&mut fb.target(), &tri, "red").unwrap_err();
        assert_eq!(err, RenderError::ZeroDepth { vertex: 0 });
        assert!(fb.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_subnormal_depth_is_rejected_before_drawing() {
        let mut r = renderer();
        r.register_shader("finite", |_: &mut [u8; 4], p: Vec3, _: &[f64], attrs: &[f64]| {
            assert!(p.is_finite());
            assert!(attrs.iter().all(|a| a.is_finite()));
        });

        let mut world = [(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)].map(|(x, y)| Vec3::new(x, y, 1.0));
        world[0].z = 1e-320;
        let attrs: [&[f64]; 3] = [&[1.0], &[1.0], &[1.0]];
        let tri = Triangle::new(world, world, &[], attrs);

        let mut fb = Framebuffer::new(4, 4);
        let err = r.render(&mut fb.target(), &tri, "finite").unwrap_err();
        assert!(matches!(err, RenderError::InvalidDepth { vertex: 0, .. }));
        assert!(fb.pixels.iter().all(|&b| b == 0));
        assert!(fb.zbuffer.iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_collinear_and_offscreen_draw_nothing() {
        let r = renderer();
        let mut fb = Framebuffer::new(8, 8);

        let line = flat_triangle([(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)], 1.0);
        assert_eq!(r.render(&mut fb.target(), &line, "red").unwrap(), RasterStats::default());

        let offscreen = flat_triangle([(2.0, 2.0), (3.0, 2.0), (2.0, 3.0)], 1.0);
        assert_eq!(r.render(&mut fb.target(), &offscreen, "red").unwrap(), RasterStats::default());

        assert!(fb.pixels.iter().all(|&b| b == 0));
        assert!(fb.zbuffer.iter().all(|&d| d == FAR_DEPTH));
    }

    #[test]
    fn test_nearer_triangle_wins_in_either_order() {
        let near = flat_triangle([(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)], 1.0);
        let far = flat_triangle([(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)], 5.0);
        let r = renderer();

        for order in [[(&near, "red"), (&far, "green")], [(&far, "green"), (&near, "red")]] {
            let mut fb = Framebuffer::new(4, 4);
            for (tri, shader) in order {
                r.render(&mut fb.target(), tri, shader).unwrap();
            }
            assert!(fb.pixels.chunks(4).all(|px| px == [255, 0, 0, 255]));
            assert!(fb.zbuffer.iter().all(|&d| (d - 1.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_equal_depth_keeps_first_triangle() {
        let tri = flat_triangle([(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)], 2.0);
        let r = renderer();
        let mut fb = Framebuffer::new(4, 4);
        r.render(&mut fb.target(), &tri, "green").unwrap();
        let stats = r.render(&mut fb.target(), &tri, "red").unwrap();
        assert_eq!(stats.shaded, 0);
        assert_eq!(fb.pixel(1, 1), Some(Color::GREEN));
    }

    #[test]
    fn test_shader_sees_opaque_alpha_and_interpolated_attributes() {
        let mut r = renderer();
        r.register_shader("probe", |c: &mut [u8; 4], p: Vec3, face: &[f64], attrs: &[f64]| {
            assert_eq!(c[3], 255);
            assert_eq!(face, &[9.0]);
            assert_eq!(attrs.len(), 1);
            // Constant attribute survives perspective correction
            assert!((attrs[0] - 0.5).abs() < 1e-9);
            assert!((p.z - 3.0).abs() < 1e-9);
            c[0] = 10;
        });

        let p = [(-1.0, -1.0), (3.0, -1.0), (-1.0, 3.0)].map(|(x, y)| Vec3::new(x, y, 3.0));
        let attrs: [&[f64]; 3] = [&[0.5], &[0.5], &[0.5]];
        let tri = Triangle::new(p, p, &[9.0], attrs);

        let mut fb = Framebuffer::new(2, 2);
        let stats = r.render(&mut fb.target(), &tri, "probe").unwrap();
        assert_eq!(stats.shaded, 4);
        assert_eq!(fb.pixel(0, 0), Some(Color::with_alpha(10, 0, 0, 255)));
    }

    #[test]
    fn test_aspect_corrected_mapping_squeezes_triangle() {
        let tri = flat_triangle([(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0)], 1.0);
        let mut r = renderer();
        r.settings_mut().aspect = AspectMode::Corrected;
        assert_eq!(r.settings().aspect, AspectMode::Corrected);

        // 8x4 target with aspect 2: NDC x in [-1, 1] only reaches column 4,
        // giving screen vertices (0, 0), (4, 0), (4, 4)
        let mut fb = Framebuffer::new(8, 4);
        let stats = r.render(&mut fb.target(), &tri, "red").unwrap();
        assert_eq!(stats.shaded, 10);
        assert_eq!(fb.pixel(3, 3), Some(Color::RED));
        assert_eq!(fb.pixel(3, 0), Some(Color::RED));
        for y in 0..4 {
            for x in 4..8 {
                assert_eq!(fb.pixel(x, y), Some(Color::TRANSPARENT));
            }
        }
    }
}
