//! Conversion between normalized device coordinates and pixel space

use super::math::Vec3;
use super::types::AspectMode;

/// Maps [-1, 1] device coordinates onto a `width` x `height` pixel grid
///
/// Only x and y are touched; z passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
    /// Horizontal divisor, 1.0 unless aspect-corrected
    aspect: f64,
}

impl CoordinateMapper {
    pub fn new(width: usize, height: usize, mode: AspectMode) -> Self {
        let width = width as f64;
        let height = height as f64;
        let aspect = match mode {
            AspectMode::Corrected if height > 0.0 => width / height,
            _ => 1.0,
        };
        Self { width, height, aspect }
    }

    pub fn world_to_screen(&self, v: Vec3) -> Vec3 {
        Vec3 {
            x: (v.x + 1.0) / 2.0 * self.width / self.aspect,
            y: (v.y + 1.0) / 2.0 * self.height,
            z: v.z,
        }
    }

    pub fn screen_to_world(&self, p: Vec3) -> Vec3 {
        Vec3 {
            x: p.x / self.width * 2.0 * self.aspect - 1.0,
            y: p.y / self.height * 2.0 - 1.0,
            z: p.z,
        }
    }

    /// Device coordinate of the centre of pixel (x, y)
    pub fn pixel_center(&self, x: usize, y: usize) -> Vec3 {
        self.screen_to_world(Vec3::new(x as f64 + 0.5, y as f64 + 0.5, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corners_map_to_target_edges() {
        let m = CoordinateMapper::new(320, 240, AspectMode::Stretch);
        assert_eq!(m.world_to_screen(Vec3::new(-1.0, -1.0, 3.0)), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(m.world_to_screen(Vec3::new(1.0, 1.0, 0.5)), Vec3::new(320.0, 240.0, 0.5));
    }

    #[test]
    fn test_corrected_mode_squeezes_x() {
        let m = CoordinateMapper::new(200, 100, AspectMode::Corrected);
        let p = m.world_to_screen(Vec3::new(1.0, 1.0, 0.0));
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_center_of_2x2_target() {
        let m = CoordinateMapper::new(2, 2, AspectMode::Stretch);
        assert_eq!(m.pixel_center(0, 0), Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(m.pixel_center(1, 1), Vec3::new(0.5, 0.5, 0.0));
    }

    fn mode() -> impl Strategy<Value = AspectMode> {
        prop_oneof![Just(AspectMode::Stretch), Just(AspectMode::Corrected)]
    }

    proptest! {
        #[test]
        fn screen_to_world_inverts_world_to_screen(
            x in -1.0f64..=1.0,
            y in -1.0f64..=1.0,
            width in 1usize..4096,
            height in 1usize..4096,
            mode in mode(),
        ) {
            let m = CoordinateMapper::new(width, height, mode);
            let v = Vec3::new(x, y, 0.25);
            let back = m.screen_to_world(m.world_to_screen(v));
            prop_assert!((back.x - x).abs() < 1e-9);
            prop_assert!((back.y - y).abs() < 1e-9);
            prop_assert_eq!(back.z, 0.25);
        }
    }
}
