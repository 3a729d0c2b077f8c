//! Headless renderer: draw one frame of a scene to a PNG
//!
//! Usage: `softraster-render [scene.ron] <out.png>`
//!
//! With only an output path the built-in spinning triangle is drawn.

use std::error::Error;
use std::process::ExitCode;

use softraster::rasterizer::Framebuffer;
use softraster::scene::{load_scene, Scene};

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (scene, out) = match args {
        [out] => (Scene::spinning_triangle(0.0), out),
        [path, out] => (load_scene(path)?, out),
        _ => return Err("usage: softraster-render [scene.ron] <out.png>".into()),
    };

    let renderer = scene.renderer();
    let mut fb = Framebuffer::new(scene.width, scene.height);
    let stats = scene.render(&renderer, &mut fb)?;
    fb.save_png(out)?;

    log::info!(
        "Wrote {} ({}x{}, {} pixels covered, {} shaded)",
        out,
        scene.width,
        scene.height,
        stats.covered,
        stats.shaded
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
