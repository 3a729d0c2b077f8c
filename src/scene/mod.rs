//! Scene layer - meshes, a perspective camera and RON scene files
//!
//! Sits on top of the rasterizer: meshes are moved into camera space,
//! projected, and handed over one face at a time.

mod camera;
mod file;
mod matrix;
mod mesh;

pub use camera::Camera;
pub use file::*;
pub use matrix::Mat4;
pub use mesh::Mesh;
