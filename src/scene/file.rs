//! Scene files
//!
//! Uses RON (Rusty Object Notation) for human-readable scene descriptions:
//! target size, raster settings, a camera and a list of shaded meshes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera::Camera;
use super::mesh::Mesh;
use crate::rasterizer::{Framebuffer, RasterSettings, RasterStats, RenderError, Renderer, Vec3};

/// Error type for scene loading, saving and rendering
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// A mesh and the name of the shader that draws it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub name: String,
    pub mesh: Mesh,
    pub shader: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub settings: RasterSettings,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// One triangle with red, green and blue corners, two units in front of
    /// the camera and turned `angle` radians about y
    pub fn spinning_triangle(angle: f64) -> Self {
        let mut mesh = Mesh::new(
            vec![
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .with_vertex_attributes(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]]);
        mesh.set_position(0.0, 0.0, 2.0);
        mesh.set_rotation(0.0, angle, 0.0);

        Self {
            width: 300,
            height: 200,
            settings: RasterSettings::default(),
            camera: Camera::new(70.0, 0.1, 1000.0),
            objects: vec![SceneObject {
                name: "triangle".to_string(),
                mesh,
                shader: "vertex_color".to_string(),
            }],
        }
    }

    /// Renderer configured with this scene's settings and the built-in shaders
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.settings.clone())
    }

    /// Resize and clear `fb`, then draw every object in order
    pub fn render(&self, renderer: &Renderer, fb: &mut Framebuffer) -> Result<RasterStats, SceneError> {
        fb.resize(self.width, self.height);
        fb.clear(self.settings.clear_color);

        let mut target = fb.target();
        let mut stats = RasterStats::default();
        for object in &self.objects {
            stats += renderer.render_mesh(&mut target, &object.mesh, &self.camera, &object.shader)?;
        }

        log::debug!(
            "Rendered {} objects at {}x{}: {} pixels shaded",
            self.objects.len(),
            self.width,
            self.height,
            stats.shaded
        );
        Ok(stats)
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&contents)?;
    log::info!("Loaded scene {} ({} objects)", path.display(), scene.objects.len());
    Ok(scene)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    let scene: Scene = ron::from_str(s)?;
    for object in &scene.objects {
        object.mesh.validate()?;
    }
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    const QUAD: &str = r#"(
        width: 8,
        height: 8,
        settings: (clear_color: (r: 0, g: 0, b: 0, a: 255)),
        camera: (fov: 90.0, near: 0.1, far: 100.0),
        objects: [
            (
                mesh: (
                    vertices: [(x: -4.0, y: -4.0, z: 0.0), (x: 4.0, y: -4.0, z: 0.0), (x: 0.0, y: 4.0, z: 0.0)],
                    faces: [(0, 1, 2)],
                    position: (x: 0.0, y: 0.0, z: 2.0),
                ),
                shader: "solid",
            ),
        ],
    )"#;

    #[test]
    fn test_load_from_str_with_defaults() {
        let scene = load_scene_from_str(QUAD).unwrap();
        assert_eq!(scene.width, 8);
        assert_eq!(scene.camera.aspect, 1.0);
        assert_eq!(scene.settings.clear_color, Color::BLACK);
        assert_eq!(scene.objects[0].mesh.rotation, Vec3::ZERO);
        assert!(scene.objects[0].name.is_empty());
    }

    #[test]
    fn test_render_resizes_and_clears() {
        let scene = load_scene_from_str(QUAD).unwrap();
        let mut fb = Framebuffer::new(2, 2);
        let stats = scene.render(&scene.renderer(), &mut fb).unwrap();
        assert_eq!((fb.width, fb.height), (8, 8));
        assert!(stats.shaded > 0);
        assert_eq!(fb.pixel(4, 4), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 7).map(|c| c.a), Some(255));
    }

    #[test]
    fn test_bad_face_index_is_rejected_on_load() {
        let broken = QUAD.replace("(0, 1, 2)", "(0, 1, 3)");
        match load_scene_from_str(&broken) {
            Err(SceneError::Render(RenderError::FaceIndex { index: 3, .. })) => {}
            other => panic!("expected face index error, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_vertex_attributes_are_rejected_on_load() {
        let ragged = QUAD.replace(
            "faces: [(0, 1, 2)],",
            "faces: [(0, 1, 2)], vertex_attributes: [[0.0], [0.0], [0.0, 1.0]],",
        );
        match load_scene_from_str(&ragged) {
            Err(SceneError::Render(RenderError::AttributeLength { vertex: 2, expected: 1, actual: 2 })) => {}
            other => panic!("expected attribute length error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_shader_surfaces_from_render() {
        let mut scene = load_scene_from_str(QUAD).unwrap();
        scene.objects[0].shader = "glow".to_string();
        let mut fb = Framebuffer::new(8, 8);
        assert!(matches!(
            scene.render(&scene.renderer(), &mut fb),
            Err(SceneError::Render(RenderError::UnknownShader(_)))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let scene = Scene::spinning_triangle(0.25);
        let path = std::env::temp_dir().join(format!("softraster-scene-{}.ron", std::process::id()));
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_spinning_triangle_draws_vertex_colors() {
        let scene = Scene::spinning_triangle(0.0);
        let mut fb = Framebuffer::new(1, 1);
        let stats = scene.render(&scene.renderer(), &mut fb).unwrap();
        assert!(stats.shaded > 0);
        let centre = fb.pixel(150, 100).unwrap();
        assert_eq!(centre.a, 255);
        assert!(centre.r > 0 && centre.g > 0 && centre.b > 0);
    }
}
