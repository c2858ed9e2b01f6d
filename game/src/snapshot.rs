//! Headless rendering: replay clicks without a window and export the canvas as PNG.

use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

use engine::HeadlessRunner;
use engine::graphics::CpuCanvas;
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};

use crate::board::BoardRenderer;
use crate::session::{Click, SessionState, TicTacToe};
use crate::settings::BoardSettings;

/// Paints `state` from scratch into an RGBA buffer of `width` x `height`.
pub fn render_state(
    settings: &BoardSettings,
    state: &SessionState,
    buf: &mut [u8],
    width: u32,
    height: u32,
) {
    let renderer = BoardRenderer::from_session(
        settings.board_config(),
        settings.input.out_of_grid,
        state.clone(),
    );
    let mut canvas = CpuCanvas::new(buf, SurfaceSize::new(width, height));
    renderer.redraw(&mut canvas, settings.colors.background);
}

/// Steps a fresh session through `clicks`, keeping every intermediate state.
pub fn replay_clicks(settings: &BoardSettings, clicks: &[Click]) -> HeadlessRunner<TicTacToe> {
    let game = TicTacToe::new(settings.board_config(), settings.input.out_of_grid);
    let mut runner = HeadlessRunner::new(game);
    runner.run(clicks.iter().copied());
    runner
}

/// Renders the final state after `clicks` onto a canvas-sized surface.
pub fn render_clicks(settings: &BoardSettings, clicks: &[Click]) -> RgbaBufferSurface {
    let runner = replay_clicks(settings, clicks);
    let size = settings.canvas_size();
    let mut surface = RgbaBufferSurface::new(size);
    render_state(settings, runner.state(), surface.frame_mut(), size.width, size.height);
    surface
}

pub fn write_png(path: impl AsRef<Path>, width: u32, height: u32, rgba: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(fs::File::create(path)?);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header().map_err(io::Error::other)?;
    png_writer.write_image_data(rgba).map_err(io::Error::other)?;
    png_writer.finish().map_err(io::Error::other)
}
