use engine::app::Sketch;
use engine::graphics::{Canvas2d, Color};
use tracing::info;

use crate::board::BoardRenderer;
use crate::settings::BoardSettings;

/// Windowed front end: the board renderer wired to the host's callbacks.
#[derive(Debug, Clone)]
pub struct BoardSketch {
    renderer: BoardRenderer,
    background: Color,
}

impl BoardSketch {
    pub fn new(renderer: BoardRenderer, background: Color) -> Self {
        Self {
            renderer,
            background,
        }
    }

    pub fn from_settings(settings: &BoardSettings) -> Self {
        Self::new(
            BoardRenderer::with_policy(settings.board_config(), settings.input.out_of_grid),
            settings.colors.background,
        )
    }

    pub fn renderer(&self) -> &BoardRenderer {
        &self.renderer
    }
}

impl Sketch for BoardSketch {
    fn setup(&mut self, canvas: &mut dyn Canvas2d) {
        canvas.clear(self.background);
        self.renderer.draw_grid(canvas);
        info!(
            offset = self.renderer.config().offset,
            cell_size = self.renderer.config().cell_size,
            policy = ?self.renderer.policy(),
            "board drawn"
        );
    }

    fn frame(&mut self, canvas: &mut dyn Canvas2d) {
        self.renderer.frame(canvas);
    }

    fn mouse_clicked(&mut self, canvas: &mut dyn Canvas2d, x: i32, y: i32) {
        self.renderer.handle_click(canvas, x, y);
    }
}
