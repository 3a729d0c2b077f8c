//! Color and depth buffers
//!
//! [`RenderTarget`] is the borrowed, size-checked view the rasterizer draws
//! into. [`Framebuffer`] owns a matching pair of buffers for callers that do
//! not manage their own memory.

use std::path::Path;

use super::depth::FAR_DEPTH;
use super::error::{RenderError, Result};
use super::types::Color;

/// Mutable view of a caller-owned RGBA8 color buffer and f64 depth buffer
#[derive(Debug)]
pub struct RenderTarget<'a> {
    pub(crate) color: &'a mut [u8],
    pub(crate) depth: &'a mut [f64],
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl<'a> RenderTarget<'a> {
    /// Wrap caller buffers; `color` must hold `width*height*4` bytes and
    /// `depth` `width*height` values
    pub fn new(color: &'a mut [u8], depth: &'a mut [f64], width: usize, height: usize) -> Result<Self> {
        check_len("color", color.len(), width * height * 4)?;
        check_len("depth", depth.len(), width * height)?;
        Ok(Self { color, depth, width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset color to `color` and depth to [`FAR_DEPTH`]
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.color.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.depth.fill(FAR_DEPTH);
    }
}

fn check_len(buffer: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(RenderError::BufferSize { buffer, expected, actual });
    }
    Ok(())
}

/// Fill the `width*height*4` byte region of a color buffer with `fill`
///
/// A fill of 0 gives the zeroed buffer expected between frames.
pub fn clear_render_buffer(buffer: &mut [u8], fill: u8, width: usize, height: usize) -> Result<()> {
    check_len("color", buffer.len(), width * height * 4)?;
    buffer.fill(fill);
    Ok(())
}

/// Reset a `width*height` depth buffer to [`FAR_DEPTH`]
pub fn clear_depth_buffer(depth: &mut [f64], width: usize, height: usize) -> Result<()> {
    check_len("depth", depth.len(), width * height)?;
    depth.fill(FAR_DEPTH);
    Ok(())
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,  // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f64>, // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    /// Resize both buffers, discarding their contents
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, color: Color) {
        self.target().clear(color);
    }

    /// Borrow the buffers as a render target
    pub fn target(&mut self) -> RenderTarget<'_> {
        RenderTarget {
            color: &mut self.pixels,
            depth: &mut self.zbuffer,
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut bytes = [0; 4];
            bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
            Some(Color::from_bytes(bytes))
        } else {
            None
        }
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Copy the color buffer into an image, top row first
    ///
    /// Buffer row 0 is device y = -1, the bottom of the picture.
    pub fn to_image(&self) -> image::RgbaImage {
        let image = image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let idx = (y as usize * self.width + x as usize) * 4;
            image::Rgba([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ])
        });
        image::imageops::flip_vertical(&image)
    }

    /// Write the color buffer out as an RGBA PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)
    }
}
