//! softraster - a software triangle rasterizer
//!
//! - `rasterizer`: coverage, interpolation, depth test and named shaders
//! - `scene`: meshes, camera and RON scene files built on the rasterizer

pub mod rasterizer;
pub mod scene;

pub use rasterizer::{Framebuffer, RasterSettings, RasterStats, RenderError, RenderTarget, Renderer, Triangle};
pub use scene::{Camera, Mesh, Scene};
