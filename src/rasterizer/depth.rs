//! Depth test

/// Value a cleared depth buffer holds: farther than any interpolated depth
pub const FAR_DEPTH: f64 = f64::INFINITY;

/// Commit `z` at `index` if it is strictly nearer than the stored depth
///
/// Ties keep the stored value, so at equal depth the first triangle drawn
/// wins. Returns whether the pixel should be shaded.
#[inline]
pub fn test_and_commit(depth: &mut [f64], index: usize, z: f64) -> bool {
    if z < depth[index] {
        depth[index] = z;
        true
    } else {
        false
    }
}
