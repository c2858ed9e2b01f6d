//! The tic-tac-toe board renderer.
//!
//! Layout is fixed at construction: the grid's top-left corner sits at `(offset, offset)` and
//! every cell is a `cell_size` square. Marks are drawn straight onto the canvas; nothing
//! checks whether a cell already holds a mark.

use std::fmt;

use engine::graphics::{Canvas2d, Color};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::SessionState;

/// Cells per side.
pub const GRID_CELLS: i32 = 3;

/// The O ring's diameter is this much smaller than the cell.
const O_INSET: i32 = 3;

pub const RED: Color = [255, 0, 0, 255];
pub const BLUE: Color = [0, 0, 255, 255];
pub const BLACK: Color = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[default]
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => f.write_str("X"),
            Player::O => f.write_str("O"),
        }
    }
}

/// Grid address `(column, row)`. Valid cells are in `[0, 2] x [0, 2]`, but values outside
/// that range are representable so pass-through clicks can be drawn off-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_on_grid(self) -> bool {
        (0..GRID_CELLS).contains(&self.x) && (0..GRID_CELLS).contains(&self.y)
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0, GRID_CELLS - 1),
            y: self.y.clamp(0, GRID_CELLS - 1),
        }
    }
}

/// One mark drawn by an accepted click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub cell: Cell,
    pub player: Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub offset: i32,
    pub cell_size: i32,
    pub o_color: Color,
    pub x_color: Color,
    pub grid_color: Color,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(10, 100, RED, BLUE, BLACK)
    }
}

impl BoardConfig {
    pub const fn new(
        offset: i32,
        cell_size: i32,
        o_color: Color,
        x_color: Color,
        grid_color: Color,
    ) -> Self {
        Self {
            offset,
            cell_size,
            o_color,
            x_color,
            grid_color,
        }
    }

    /// Pixel coordinate of grid line `index` along either axis (0 is the top/left edge).
    pub fn line_at(&self, index: i32) -> i32 {
        index
            .saturating_mul(self.cell_size)
            .saturating_add(self.offset)
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        (self.line_at(cell_x), self.line_at(cell_y))
    }

    /// Cell under a pixel position.
    ///
    /// Divides by the cell size with truncation toward zero and does not subtract the
    /// offset, so the cell boundaries seen by clicks are shifted `offset` pixels up-left of
    /// the drawn grid. A zero cell size maps every position to cell `(0, 0)`.
    pub fn cell_at(&self, px: i32, py: i32) -> Cell {
        Cell::new(
            px.checked_div(self.cell_size).unwrap_or(0),
            py.checked_div(self.cell_size).unwrap_or(0),
        )
    }
}

/// What to do with a click whose cell falls outside the 3x3 grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutOfGridPolicy {
    /// Drop the click: nothing is drawn and the turn does not change.
    #[default]
    Ignore,
    /// Snap each axis to the nearest on-grid cell.
    Clamp,
    /// Draw wherever the cell lands, even off the grid, and flip the turn.
    PassThrough,
}

impl OutOfGridPolicy {
    pub fn resolve(self, cell: Cell) -> Option<Cell> {
        if cell.is_on_grid() {
            return Some(cell);
        }
        match self {
            OutOfGridPolicy::Ignore => None,
            OutOfGridPolicy::Clamp => Some(cell.clamped()),
            OutOfGridPolicy::PassThrough => Some(cell),
        }
    }
}

/// Maps a click to the cell that should receive a mark, if any.
pub fn resolve_click(
    config: &BoardConfig,
    policy: OutOfGridPolicy,
    px: i32,
    py: i32,
) -> Option<Cell> {
    policy.resolve(config.cell_at(px, py))
}

/// Draws the grid and marks, and owns whose turn it is.
///
/// `handle_click` is the only writer of the turn state.
#[derive(Debug, Clone)]
pub struct BoardRenderer {
    config: BoardConfig,
    policy: OutOfGridPolicy,
    session: SessionState,
}

impl BoardRenderer {
    pub fn new(config: BoardConfig) -> Self {
        Self::with_policy(config, OutOfGridPolicy::default())
    }

    pub fn with_policy(config: BoardConfig, policy: OutOfGridPolicy) -> Self {
        Self::from_session(config, policy, SessionState::new())
    }

    pub fn from_session(
        config: BoardConfig,
        policy: OutOfGridPolicy,
        session: SessionState,
    ) -> Self {
        Self {
            config,
            policy,
            session,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn policy(&self) -> OutOfGridPolicy {
        self.policy
    }

    pub fn turn(&self) -> Player {
        self.session.turn()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Two horizontal and two vertical segments splitting the grid square into 9 cells.
    pub fn draw_grid(&self, canvas: &mut dyn Canvas2d) {
        let start = self.config.offset;
        let end = self.config.line_at(GRID_CELLS);

        canvas.set_stroke(self.config.grid_color);
        for i in 1..GRID_CELLS {
            let y = self.config.line_at(i);
            canvas.line(start, y, end, y);
        }
        for i in 1..GRID_CELLS {
            let x = self.config.line_at(i);
            canvas.line(x, start, x, end);
        }
    }

    pub fn draw_mark_o(&self, canvas: &mut dyn Canvas2d, cell_x: i32, cell_y: i32) {
        let (left, top) = self.config.cell_origin(cell_x, cell_y);
        let half = self.config.cell_size / 2;
        let diameter = self.config.cell_size.saturating_sub(O_INSET);

        canvas.set_stroke(self.config.o_color);
        canvas.ellipse(
            left.saturating_add(half),
            top.saturating_add(half),
            diameter,
            diameter,
        );
    }

    pub fn draw_mark_x(&self, canvas: &mut dyn Canvas2d, cell_x: i32, cell_y: i32) {
        let (left, top) = self.config.cell_origin(cell_x, cell_y);
        let right = left.saturating_add(self.config.cell_size);
        let bottom = top.saturating_add(self.config.cell_size);

        canvas.set_stroke(self.config.x_color);
        canvas.line(left, top, right, bottom);
        canvas.line(left, bottom, right, top);
    }

    pub fn draw_mark(&self, canvas: &mut dyn Canvas2d, placement: &Placement) {
        let Cell { x, y } = placement.cell;
        match placement.player {
            Player::X => self.draw_mark_x(canvas, x, y),
            Player::O => self.draw_mark_o(canvas, x, y),
        }
    }

    /// Marks the clicked cell for the player to move, then passes the turn.
    ///
    /// Returns `None` when the out-of-grid policy drops the click; the turn is unchanged
    /// in that case.
    pub fn handle_click(
        &mut self,
        canvas: &mut dyn Canvas2d,
        px: i32,
        py: i32,
    ) -> Option<Placement> {
        let Some(cell) = resolve_click(&self.config, self.policy, px, py) else {
            debug!(px, py, policy = ?self.policy, "click outside the grid dropped");
            return None;
        };

        let placement = self.session.place(cell);
        self.draw_mark(canvas, &placement);
        debug!(
            px,
            py,
            cell_x = cell.x,
            cell_y = cell.y,
            player = %placement.player,
            next = %self.session.turn(),
            "mark placed"
        );
        Some(placement)
    }

    /// Per-frame hook. Everything is drawn when it happens, so there is nothing to do.
    pub fn frame(&mut self, _canvas: &mut dyn Canvas2d) {}

    /// Repaints from scratch: background, grid, then every placement in order.
    pub fn redraw(&self, canvas: &mut dyn Canvas2d, background: Color) {
        canvas.clear(background);
        self.draw_grid(canvas);
        for placement in self.session.placements() {
            self.draw_mark(canvas, placement);
        }
    }
}
