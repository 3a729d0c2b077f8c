//! Bounding box of a screen-space triangle

use super::math::Vec3;
use super::types::Bounds;

/// Inclusive pixel box around the three screen-space vertices, clamped to the
/// render target
///
/// Components are floored, so a triangle lying entirely above or left of the
/// target yields a negative `bottom`/`right` and an empty box. Non-finite
/// input also yields an empty box.
pub fn bounding_box(a: Vec3, b: Vec3, c: Vec3, width: usize, height: usize) -> Bounds {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Bounds { top: 0, bottom: -1, left: 0, right: -1 };
    }

    let top = a.y.min(b.y).min(c.y).max(0.0);
    let bottom = a.y.max(b.y).max(c.y).min(height as f64);
    let left = a.x.min(b.x).min(c.x).max(0.0);
    let right = a.x.max(b.x).max(c.x).min(width as f64);

    Bounds {
        top: top.floor() as i64,
        bottom: bottom.floor() as i64,
        left: left.floor() as i64,
        right: right.floor() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_encloses_vertices() {
        let b = bounding_box(
            Vec3::new(1.5, 2.2, 0.0),
            Vec3::new(6.9, 3.0, 0.0),
            Vec3::new(3.0, 7.7, 0.0),
            10,
            10,
        );
        assert_eq!(b, Bounds { top: 2, bottom: 7, left: 1, right: 6 });
        assert!(!b.is_empty());
    }

    #[test]
    fn test_box_is_clamped_to_target() {
        let b = bounding_box(
            Vec3::new(-5.0, -5.0, 0.0),
            Vec3::new(50.0, -5.0, 0.0),
            Vec3::new(0.0, 50.0, 0.0),
            8,
            4,
        );
        assert_eq!(b, Bounds { top: 0, bottom: 4, left: 0, right: 8 });
    }

    #[test]
    fn test_offscreen_triangle_gives_empty_box() {
        let left_of_target = bounding_box(
            Vec3::new(-9.0, 1.0, 0.0),
            Vec3::new(-3.0, 1.0, 0.0),
            Vec3::new(-6.0, 3.0, 0.0),
            8,
            8,
        );
        assert!(left_of_target.is_empty());

        let below_target = bounding_box(
            Vec3::new(1.0, 12.0, 0.0),
            Vec3::new(3.0, 12.0, 0.0),
            Vec3::new(2.0, 15.0, 0.0),
            8,
            8,
        );
        // top lands past the last row, bottom is clamped to the height
        assert!(below_target.top > below_target.bottom);
    }

    #[test]
    fn test_nan_gives_empty_box() {
        let b = bounding_box(Vec3::new(f64::NAN, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO, 4, 4);
        assert!(b.is_empty());
    }
}
