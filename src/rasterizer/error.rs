//! Render errors
//!
//! Only caller contract violations surface here. Geometry that cannot be
//! drawn (zero area, off-target, non-finite) is not an error: it draws
//! nothing.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// A render call referenced a shader that was never registered
    #[error("unknown shader `{0}`")]
    UnknownShader(String),

    /// A buffer does not match the dimensions it was passed with
    #[error("{buffer} buffer holds {actual} elements, expected {expected}")]
    BufferSize {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Per-vertex attribute vectors of one triangle differ in length
    #[error("vertex {vertex} has {actual} attributes, expected {expected}")]
    AttributeLength {
        vertex: usize,
        expected: usize,
        actual: usize,
    },

    /// A vertex sits at world depth zero, so its reciprocal depth is undefined
    #[error("vertex {vertex} has zero world-space depth")]
    ZeroDepth { vertex: usize },

    /// A vertex depth is not finite or too close to zero for `1/z` to be finite
    #[error("vertex {vertex} has unusable world-space depth {depth}")]
    InvalidDepth { vertex: usize, depth: f64 },

    /// A mesh face points past the end of the vertex list
    #[error("face {face} references vertex {index}, mesh has {vertices}")]
    FaceIndex {
        face: usize,
        index: usize,
        vertices: usize,
    },

    /// A mesh has attribute lists that do not line up with its vertices or faces
    #[error("mesh has {actual} {kind} attribute lists, expected 0 or {expected}")]
    MeshAttributes {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
