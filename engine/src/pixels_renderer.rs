use pixels::Pixels;

use crate::error::EngineError;
use crate::surface::{Surface, SurfaceSize};

/// Windowed RGBA surface backed by `pixels`.
///
/// The framebuffer keeps the canvas size for the whole run; only the window-side surface
/// follows the OS window, and `pixels` scales the buffer onto it.
pub struct PixelsSurface {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsSurface {
    pub fn new(pixels: Pixels, size: SurfaceSize) -> Self {
        Self { pixels, size }
    }

    /// Tracks a window resize without touching the framebuffer contents.
    pub fn resize_window(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    /// Maps a physical window position to canvas pixel coordinates.
    ///
    /// Positions outside the canvas are returned as-is (possibly negative or past the far
    /// edge) so callers can decide what an off-canvas click means.
    pub fn window_pos_to_canvas(&self, position: (f64, f64)) -> (i32, i32) {
        let pos = (position.0 as f32, position.1 as f32);
        match self.pixels.window_pos_to_pixel(pos) {
            Ok((x, y)) => (clamp_to_i32(x as i64), clamp_to_i32(y as i64)),
            Err((x, y)) => (clamp_to_i32(x as i64), clamp_to_i32(y as i64)),
        }
    }
}

fn clamp_to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Surface for PixelsSurface {
    type Error = EngineError;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn frame(&self) -> &[u8] {
        self.pixels.frame()
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.pixels.render()?;
        Ok(())
    }
}
