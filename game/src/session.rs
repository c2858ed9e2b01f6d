use std::num::ParseIntError;
use std::str::FromStr;

use engine::GameLogic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{BoardConfig, Cell, OutOfGridPolicy, Placement, Player, resolve_click};

/// Whose turn it is, plus every mark drawn so far in draw order.
///
/// The placement log never rejects anything: a cell may appear many times, and later
/// entries are drawn over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    turn: Player,
    placements: Vec<Placement>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Records a mark for the player to move and passes the turn.
    pub fn place(&mut self, cell: Cell) -> Placement {
        let placement = Placement {
            cell,
            player: self.turn,
        };
        self.placements.push(placement);
        self.turn = self.turn.other();
        placement
    }

    /// The mark drawn last at `cell`, i.e. the one visible on top.
    pub fn top_mark(&self, cell: Cell) -> Option<Player> {
        self.placements
            .iter()
            .rev()
            .find(|p| p.cell == cell)
            .map(|p| p.player)
    }
}

/// A pointer click in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub x: i32,
    pub y: i32,
}

impl Click {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseClickError {
    #[error("click `{0}` is not of the form x,y")]
    Shape(String),
    #[error("click `{input}` has a non-integer coordinate: {source}")]
    Coordinate {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

impl FromStr for Click {
    type Err = ParseClickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParseClickError::Shape(s.to_string()))?;
        let coord = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|source| ParseClickError::Coordinate {
                    input: s.to_string(),
                    source,
                })
        };
        Ok(Self::new(coord(x)?, coord(y)?))
    }
}

/// Parses clicks separated by whitespace or `;`, e.g. `"150,150 20,20;250,40"`.
pub fn parse_clicks(s: &str) -> Result<Vec<Click>, ParseClickError> {
    s.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|part| !part.is_empty())
        .map(str::parse::<Click>)
        .collect()
}

/// Turn logic as a pure step function, for headless replay.
///
/// Uses the same click resolution as [`crate::board::BoardRenderer::handle_click`], so a
/// replayed click sequence ends in the same state as the live window.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe {
    config: BoardConfig,
    policy: OutOfGridPolicy,
}

impl TicTacToe {
    pub fn new(config: BoardConfig, policy: OutOfGridPolicy) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn policy(&self) -> OutOfGridPolicy {
        self.policy
    }
}

impl GameLogic for TicTacToe {
    type State = SessionState;
    type Input = Click;

    fn initial_state(&self) -> Self::State {
        SessionState::new()
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        if let Some(cell) = resolve_click(&self.config, self.policy, input.x, input.y) {
            next.place(cell);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_records_and_flips() {
        let mut state = SessionState::new();
        let first = state.place(Cell::new(1, 1));
        let second = state.place(Cell::new(1, 1));

        assert_eq!(first.player, Player::X);
        assert_eq!(second.player, Player::O);
        assert_eq!(state.turn(), Player::X);
        assert_eq!(state.placements().len(), 2);
        assert_eq!(state.top_mark(Cell::new(1, 1)), Some(Player::O));
        assert_eq!(state.top_mark(Cell::new(0, 0)), None);
    }

    #[test]
    fn parse_clicks_accepts_mixed_separators() {
        let clicks = parse_clicks(" 150,150  20,20;250,40 ").expect("valid clicks");
        assert_eq!(
            clicks,
            vec![Click::new(150, 150), Click::new(20, 20), Click::new(250, 40)]
        );
        assert_eq!(parse_clicks("").expect("empty is fine"), Vec::new());
    }

    #[test]
    fn parse_clicks_reports_bad_input() {
        assert_eq!(
            parse_clicks("10,10 oops"),
            Err(ParseClickError::Shape("oops".to_string()))
        );
        assert!(matches!(
            "1,x".parse::<Click>(),
            Err(ParseClickError::Coordinate { .. })
        ));
    }
}
