//! Tic-tac-toe game state and the engine seam.
//!
//! The responder only depends on the [`Engine`] trait; [`engine::TicTacToe`]
//! is the single production implementation. Sessions own a boxed engine
//! behind their own lock (see [`session`]), so engine methods themselves are
//! plain synchronous state transitions.

use crate::error::Error;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod engine;
pub mod reaper;
pub mod session;

pub use engine::TicTacToe;
pub use reaper::SessionReaper;
pub use session::{Manager, PlayerToken, Session, SharedManager};

/// A boxed [`Engine`] owned by a session.
pub type DynEngine = Box<dyn Engine + Send + Sync>;

/// One of the two players. An unclaimed cell is represented separately by
/// [`Cell`], so a `Player` value always names an actual mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// The player who moves after this one.
    #[must_use]
    pub fn opponent(self) -> Player {
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

/// A single board cell: empty, or claimed by a player.
///
/// Serializes to `""`, `"X"` or `"O"` so the JSON board is an array of
/// strings with empty cells as empty strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell(pub Option<Player>);

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(player) => player.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "" => Ok(Cell(None)),
            "X" => Ok(Cell(Some(Player::X))),
            "O" => Ok(Cell(Some(Player::O))),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &r#""", "X" or "O""#,
            )),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(player) => player.fmt(f),
            None => f.write_str("_"),
        }
    }
}

/// The 3x3 grid, rows then columns.
pub type Board = [[Cell; 3]; 3];

/// Game lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "playing")]
    Playing,
    #[serde(rename = "X_wins")]
    XWins,
    #[serde(rename = "O_wins")]
    OWins,
    #[serde(rename = "draw")]
    Draw,
}

impl Status {
    /// True once the game can accept no further moves.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::XWins | Status::OWins | Status::Draw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "pending",
            Status::Playing => "playing",
            Status::XWins => "X_wins",
            Status::OWins => "O_wins",
            Status::Draw => "draw",
        };
        f.write_str(s)
    }
}

/// A point-in-time snapshot of a game.
///
/// The serialized form is the external JSON contract:
/// `{"board":[[..],[..],[..]],"turn":"X","status":"playing"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Player,
    pub status: Status,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            board: Board::default(),
            turn: Player::X,
            status: Status::Pending,
        }
    }
}

/// The capability set the responder needs from a game engine.
pub trait Engine {
    /// An independent snapshot of the current state.
    fn state(&self) -> GameState;

    /// Transition `pending` -> `playing`; no-op in any other status.
    fn start_game(&mut self);

    /// Attempt a move. Preconditions are checked in a fixed order and the
    /// first failure wins: terminal status, turn, position range, cell
    /// occupancy.
    fn make_move(&mut self, row: i32, col: i32, player: Player) -> Result<(), Error>;

    /// Restore the initial state: empty board, X to move, `pending`.
    fn reset(&mut self);

    /// Human-readable board block, ready to append to a `Session:` line.
    fn format_board(&self) -> String;

    /// The state snapshot as canonical JSON.
    fn state_json(&self) -> String;
}
