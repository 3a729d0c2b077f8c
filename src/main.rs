//! softraster viewer
//!
//! Renders a scene with the software rasterizer every frame and blits the
//! framebuffer to the window. Without arguments it spins the built-in
//! vertex-colored triangle; with a path it loads that RON scene and spins its
//! first object.
//!
//! Keys: Space pauses, A toggles affine attribute interpolation.

use macroquad::prelude::*;
use softraster::rasterizer::{AttributeMode, Framebuffer};
use softraster::scene::{load_scene, Scene};
use std::f64::consts::TAU;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds per full turn of the animated object
const TURN_SECONDS: f64 = 5.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("softraster v{}", VERSION),
        window_width: 900,
        window_height: 600,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn initial_scene() -> Scene {
    let Some(path) = std::env::args().nth(1) else {
        return Scene::spinning_triangle(0.0);
    };
    match load_scene(&path) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to load {}: {}, using built-in scene", path, e);
            Scene::spinning_triangle(0.0)
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = initial_scene();
    let mut renderer = scene.renderer();
    let mut fb = Framebuffer::new(scene.width, scene.height);
    let base_rotation = scene.objects.first().map(|o| o.mesh.rotation.y).unwrap_or(0.0);

    let mut paused = false;
    let mut elapsed = 0.0;
    let mut last_error: Option<String> = None;

    loop {
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if is_key_pressed(KeyCode::A) {
            let settings = renderer.settings_mut();
            settings.attributes = match settings.attributes {
                AttributeMode::Affine => AttributeMode::Perspective,
                _ => AttributeMode::Affine,
            };
            log::info!("Attribute interpolation: {:?}", settings.attributes);
        }
        if !paused {
            elapsed += get_frame_time() as f64;
        }

        if let Some(object) = scene.objects.first_mut() {
            object.mesh.rotation.y = base_rotation + elapsed / TURN_SECONDS * TAU;
        }

        match scene.render(&renderer, &mut fb) {
            Ok(_) => last_error = None,
            Err(e) => {
                let message = e.to_string();
                if last_error.as_deref() != Some(message.as_str()) {
                    log::error!("Render failed: {}", message);
                }
                last_error = Some(message);
            }
        }

        clear_background(Color::from_rgba(30, 30, 35, 255));

        // Fit the framebuffer to the window, keeping its aspect ratio
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let (draw_w, draw_h) = (fb.width as f32 * scale, fb.height as f32 * scale);
        let draw_x = (screen_width() - draw_w) / 2.0;
        let draw_y = (screen_height() - draw_h) / 2.0;

        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_w, draw_h)),
                flip_y: true,
                ..Default::default()
            },
        );

        draw_text(
            &format!("FPS: {}  attributes: {:?}", get_fps(), renderer.settings().attributes),
            10.0,
            20.0,
            20.0,
            Color::from_rgba(200, 200, 200, 255),
        );
        if let Some(message) = &last_error {
            draw_text(message, 10.0, 40.0, 16.0, Color::from_rgba(230, 90, 90, 255));
        }

        next_frame().await;
    }
}
