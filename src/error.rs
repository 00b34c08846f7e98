//! Error types.

use crate::game::{Player, Status};
use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible tictacdns error states.
///
/// The `Display` strings of the game and session variants are part of the
/// wire contract: clients match TXT payloads of the form `ERROR: <message>`
/// with regular expressions, so the exact text must not change.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned by the engine when a move arrives after the game reached a
    /// terminal status.
    #[error("game is over: {0}")]
    GameOver(Status),

    /// Returned by the engine when a player moves out of turn.
    #[error("not {player}'s turn (current turn: {current})")]
    WrongTurn { player: Player, current: Player },

    /// Returned by the engine when the move coordinates fall outside the
    /// 3x3 board.
    #[error("invalid position: row={row}, col={col} (must be 0-2)")]
    InvalidPosition { row: i32, col: i32 },

    /// Returned by the engine when the target cell is already occupied.
    #[error("position already taken")]
    PositionTaken,

    /// Returned on `join` once a session already holds two players.
    #[error("session is full (2 players already joined)")]
    SessionFull,

    /// Returned when a per-session command names an id with no live session.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Returned when a move carries a token the session never issued.
    #[error("invalid player token: {0}")]
    InvalidPlayerToken(String),

    /// Returned when a move arrives without any player token.
    #[error("player token is required")]
    TokenRequired,

    /// Returned when a move arrives before both players have joined.
    #[error("waiting for players to join (need 2 players)")]
    WaitingForPlayers,

    /// Returned when a `move` command is recognized but its parameters don't
    /// parse.
    #[error("invalid move format: {0}. Use: {{session-id}}-{{token}}-move-ROW-COL (e.g., abc123-xyz78901-move-1-1)")]
    InvalidMoveFormat(String),

    /// Returned by the grammar when the question name lies outside the
    /// configured zone. Never rendered as a TXT payload; the responder maps
    /// it to rcode NXDOMAIN.
    #[error("zone mismatch: query for {qname}, expected {zone}")]
    ZoneMismatch { qname: String, zone: String },

    /// Returned at startup when an environment variable fails to parse.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when the DNS server encounters a generic DNS protocol error.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
