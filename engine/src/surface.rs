use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

/// A fixed-size RGBA drawing surface.
///
/// Canvases rasterize into `frame_mut()`; `present()` shows the pixels somewhere (a window,
/// or nowhere for headless runs). Pixels persist between presents, so callers only draw
/// what changed.
pub trait Surface {
    type Error;

    fn size(&self) -> SurfaceSize;
    fn frame(&self) -> &[u8];
    fn frame_mut(&mut self) -> &mut [u8];

    fn present(&mut self) -> Result<(), Self::Error>;
}

/// An in-memory RGBA surface for headless execution and tests.
#[derive(Debug, Clone)]
pub struct RgbaBufferSurface {
    size: SurfaceSize,
    buf: Vec<u8>,
    presented: usize,
}

impl RgbaBufferSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            buf: vec![0u8; size.rgba_len()],
            presented: 0,
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + x as usize) * 4;
        let px = self.buf.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of completed `present()` calls.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl Surface for RgbaBufferSurface {
    type Error = Infallible;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn frame(&self) -> &[u8] {
        &self.buf
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_matches_size() {
        let surface = RgbaBufferSurface::new(SurfaceSize::new(310, 310));
        assert_eq!(surface.frame().len(), 310 * 310 * 4);
        assert_eq!(surface.pixel(309, 309), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(310, 0), None);
    }

    #[test]
    fn contains_rejects_negative_and_edge_coordinates() {
        let size = SurfaceSize::new(4, 3);
        assert!(size.contains(0, 0));
        assert!(size.contains(3, 2));
        assert!(!size.contains(-1, 0));
        assert!(!size.contains(4, 0));
        assert!(!size.contains(0, 3));
    }
}
