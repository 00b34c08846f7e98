//! TXT payload formatting.
//!
//! Every string produced here is part of the wire contract: external clients
//! (including the HTTP bridge) scrape these payloads with regular
//! expressions such as `Session ID: (\w+)` and `Player Token: (\w+)`, so
//! punctuation, capitalization and newlines are all load-bearing. Board
//! blocks come from [`Engine::format_board`][crate::game::Engine] and begin
//! with their own newline.

use crate::error::Error;
use crate::game::Player;

/// `ERROR: <message>`.
pub fn error(err: &Error) -> String {
    format!("ERROR: {err}")
}

/// `ERROR: <message>` with an extra context line appended.
pub fn error_with_context(err: &Error, context: &str) -> String {
    format!("ERROR: {err}\n{context}")
}

/// Reply to `new` / `create`.
pub fn session_created(id: &str, zone: &str) -> String {
    format!(
        "New session created!\nSession ID: {id}\n\nUse this ID in your queries:\n- {id}.board.{zone}\n- {id}.move-1-2-X.{zone}\n- {id}.reset.{zone}"
    )
}

/// Reply to `list` / `sessions`.
pub fn session_list(sessions: &[String], zone: &str) -> String {
    if sessions.is_empty() {
        return format!("No active sessions. Create one with: new.{zone}");
    }
    format!(
        "Active sessions ({}):\n{}",
        sessions.len(),
        sessions.join("\n")
    )
}

/// Board view: the session line followed by the board block.
pub fn board(id: &str, board: &str) -> String {
    format!("Session: {id}\n{board}")
}

/// Board view with a status line between the session line and the board.
pub fn board_with_message(id: &str, message: &str, board: &str) -> String {
    format!("Session: {id}\n{message}\n{board}")
}

/// Successful move.
pub fn move_accepted(id: &str, board: &str) -> String {
    board_with_message(id, "Move accepted!", board)
}

/// Rejected move; the current board rides along so the client can recover
/// without a second round-trip.
pub fn move_error(id: &str, err: &Error, board: &str) -> String {
    board_with_message(id, &format!("ERROR: {err}"), board)
}

/// Reply to `reset`.
pub fn reset(id: &str, board: &str) -> String {
    board_with_message(id, "Game reset!", board)
}

/// Successful join: the token this payload carries is the caller's bearer
/// credential for every later move.
pub fn join_success(id: &str, token: &str, player: Player, zone: &str) -> String {
    format!(
        "Joined session: {id}\nPlayer Token: {token}\nYou are playing as: {player}\n\nUse your token to make moves:\n{id}-{token}-move-ROW-COL.{zone}\n\nExample: {id}-{token}-move-1-1.{zone}"
    )
}

/// The help text, templated on the configured zone.
pub fn help(zone: &str) -> String {
    format!(
        "DNS Tic-Tac-Toe Commands:

Session Management:
- new.{zone} - Create a new game session
- list.{zone} - List all active sessions

Game Commands (replace {{session-id}} with your session ID, {{token}} with your player token):
- {{session-id}}.join.{zone} - Join a session and get your player token
- {{session-id}}.board.{zone} - View current board
- {{session-id}}-{{token}}-move-ROW-COL.{zone} - Make a move using your token
- {{session-id}}.reset.{zone} - Reset the game
- {{session-id}}.json.{zone} - Get board state as JSON
- {{session-id}}.{zone} - View board (shortcut)

Example:
1. dig @127.0.0.1 TXT new.{zone}  # Create session, get ID
2. dig @127.0.0.1 TXT abc123.join.{zone}  # Join session, get token (assigned X or O)
3. dig @127.0.0.1 TXT abc123-xyz78901-move-1-1.{zone}  # Make move with token"
    )
}
