//! Indexed triangle meshes and drawing them through a camera

use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::matrix::Mat4;
use crate::rasterizer::{RasterStats, RenderError, RenderTarget, Renderer, Result, Triangle, Vec3};

/// Triangle mesh with a model transform
///
/// `vertex_attributes` is either empty or holds one list per vertex;
/// `face_attributes` is either empty or holds one list per face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[usize; 3]>,
    #[serde(default)]
    pub vertex_attributes: Vec<Vec<f64>>,
    #[serde(default)]
    pub face_attributes: Vec<Vec<f64>>,
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in radians
    #[serde(default)]
    pub rotation: Vec3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            ..Default::default()
        }
    }

    pub fn with_vertex_attributes(mut self, attributes: Vec<Vec<f64>>) -> Self {
        self.vertex_attributes = attributes;
        self
    }

    pub fn with_face_attributes(mut self, attributes: Vec<Vec<f64>>) -> Self {
        self.face_attributes = attributes;
        self
    }

    /// Store each face's geometric normal (model space) as its face attributes
    pub fn with_face_normals(mut self) -> Self {
        self.face_attributes = self
            .faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.map(|i| self.vertices.get(i).copied().unwrap_or_default());
                let n = (b - a).cross(c - a).normalize();
                vec![n.x, n.y, n.z]
            })
            .collect();
        self
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.position = self.position + Vec3::new(x, y, z);
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn rotate(&mut self, x: f64, y: f64, z: f64) {
        self.rotation = self.rotation + Vec3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.rotation = Vec3::new(x, y, z);
    }

    /// Model matrix: rotate about the origin, then move to `position`
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::rotation(self.rotation.x, self.rotation.y, self.rotation.z)
            .mul(&Mat4::translation(self.position))
    }

    /// Vertices with rotation and position applied
    pub fn transformed_vertices(&self) -> Vec<Vec3> {
        let model = self.model_matrix();
        self.vertices.iter().map(|&v| model.transform_point(v)).collect()
    }

    /// Check face indices, attribute list counts, and that every vertex has
    /// the same number of attributes
    pub fn validate(&self) -> Result<()> {
        let vertices = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices) {
                return Err(RenderError::FaceIndex { face, index, vertices });
            }
        }
        check_count("vertex", self.vertex_attributes.len(), vertices)?;
        check_count("face", self.face_attributes.len(), self.faces.len())?;

        if let Some(first) = self.vertex_attributes.first() {
            let expected = first.len();
            for (vertex, attrs) in self.vertex_attributes.iter().enumerate() {
                if attrs.len() != expected {
                    return Err(RenderError::AttributeLength { vertex, expected, actual: attrs.len() });
                }
            }
        }
        Ok(())
    }
}

fn check_count(kind: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != 0 && actual != expected {
        return Err(RenderError::MeshAttributes { kind, expected, actual });
    }
    Ok(())
}

impl Renderer {
    /// Draw every face of `mesh` as seen from `camera`
    ///
    /// Faces with a vertex at or behind the near plane are skipped whole;
    /// there is no clipping. Stats are summed over all faces. Every face is
    /// validated before the first one is drawn, so on error the target is
    /// untouched.
    pub fn render_mesh(
        &self,
        target: &mut RenderTarget<'_>,
        mesh: &Mesh,
        camera: &Camera,
        shader_name: &str,
    ) -> Result<RasterStats> {
        self.shaders().get(shader_name)?;
        mesh.validate()?;

        let view = mesh.model_matrix().mul(&camera.view_matrix());
        let world: Vec<Vec3> = mesh.vertices.iter().map(|&v| view.transform_point(v)).collect();
        let projected: Vec<Vec3> = world.iter().map(|&v| camera.project(v)).collect();

        let mut triangles = Vec::with_capacity(mesh.faces.len());
        for (i, face) in mesh.faces.iter().enumerate() {
            if face.iter().any(|&v| !camera.in_front(world[v].z)) {
                continue;
            }

            let vertex_attributes = face.map(|v| mesh.vertex_attributes.get(v).map_or(&[][..], Vec::as_slice));
            let face_attributes = mesh.face_attributes.get(i).map_or(&[][..], Vec::as_slice);

            let triangle = Triangle::new(
                face.map(|v| world[v]),
                face.map(|v| projected[v]),
                face_attributes,
                vertex_attributes,
            );
            triangle.validate()?;
            triangles.push(triangle);
        }

        // Every face checked above, so drawing can no longer fail halfway
        let mut stats = RasterStats::default();
        for triangle in &triangles {
            stats += self.render(target, triangle, shader_name)?;
        }

        let skipped = mesh.faces.len() - triangles.len();
        if skipped > 0 {
            log::debug!("Skipped {} of {} faces crossing the near plane", skipped, mesh.faces.len());
        }
        Ok(stats)
    }
}
