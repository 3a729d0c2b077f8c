//! Software triangle rasterizer
//!
//! Features:
//! - Fixed-point half-edge coverage with a top-left fill convention
//! - Perspective-correct depth and attribute interpolation
//! - Strict less-than depth test (first triangle wins ties)
//! - Shaders looked up by name, one call per visible pixel

mod bounds;
mod coords;
mod depth;
mod edge;
mod error;
mod framebuffer;
mod interpolate;
mod math;
mod render;
mod shader;
mod types;

pub use bounds::bounding_box;
pub use coords::CoordinateMapper;
pub use depth::{test_and_commit, FAR_DEPTH};
pub use edge::{in_fixed_range, EdgeRasterizer, Fixed, MAX_SCREEN_COORD, SUBPIXEL_BITS, SUBPIXEL_ONE};
pub use error::{RenderError, Result};
pub use framebuffer::{clear_depth_buffer, clear_render_buffer, Framebuffer, RenderTarget};
pub use interpolate::{Barycentric, Interpolator};
pub use math::*;
pub use render::Renderer;
pub use shader::{Checkerboard, DepthGray, FlatLit, Shader, ShaderRegistry, SolidColor, VertexColor};
pub use types::*;
