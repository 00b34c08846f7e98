//! The production tic-tac-toe engine.

use crate::error::Error;
use crate::game::{Cell, Engine, GameState, Player, Status};
use std::fmt::Write;

/// Straightforward [`Engine`] implementation over a [`GameState`] value.
///
/// The engine holds no lock of its own; the owning session serializes access
/// (see [`crate::game::session::Session`]).
#[derive(Debug, Default, Clone)]
pub struct TicTacToe {
    state: GameState,
}

impl TicTacToe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `player` owns three in a row through the last move. Only the
    /// three rows, three columns and two diagonals need inspecting.
    fn has_win(&self, player: Player) -> bool {
        let owned =
            |row: usize, col: usize| self.state.board[row][col] == Cell(Some(player));
        (0..3).any(|i| {
            (owned(i, 0) && owned(i, 1) && owned(i, 2))
                || (owned(0, i) && owned(1, i) && owned(2, i))
        }) || (owned(0, 0) && owned(1, 1) && owned(2, 2))
            || (owned(0, 2) && owned(1, 1) && owned(2, 0))
    }

    fn is_board_full(&self) -> bool {
        self.state
            .board
            .iter()
            .flatten()
            .all(|cell| cell.0.is_some())
    }
}

impl Engine for TicTacToe {
    fn state(&self) -> GameState {
        self.state
    }

    fn start_game(&mut self) {
        if self.state.status == Status::Pending {
            self.state.status = Status::Playing;
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn make_move(&mut self, row: i32, col: i32, player: Player) -> Result<(), Error> {
        if self.state.status != Status::Playing {
            return Err(Error::GameOver(self.state.status));
        }
        if player != self.state.turn {
            return Err(Error::WrongTurn {
                player,
                current: self.state.turn,
            });
        }
        if !(0..3).contains(&row) || !(0..3).contains(&col) {
            return Err(Error::InvalidPosition { row, col });
        }
        let (row, col) = (row as usize, col as usize);
        if self.state.board[row][col].0.is_some() {
            return Err(Error::PositionTaken);
        }

        self.state.board[row][col] = Cell(Some(player));

        if self.has_win(player) {
            self.state.status = match player {
                Player::X => Status::XWins,
                Player::O => Status::OWins,
            };
        } else if self.is_board_full() {
            self.state.status = Status::Draw;
        } else {
            self.state.turn = self.state.turn.opponent();
        }
        Ok(())
    }

    fn reset(&mut self) {
        // Back to pending; the caller restarts the game if both players are
        // still joined.
        self.state = GameState::default();
    }

    fn format_board(&self) -> String {
        let mut out = String::from("\n");
        for row in &self.state.board {
            let _ = writeln!(out, "{} {} {}", row[0], row[1], row[2]);
        }
        let _ = writeln!(
            out,
            "Turn: {} | Status: {}",
            self.state.turn, self.state.status
        );
        out
    }

    fn state_json(&self) -> String {
        // NB: unwrap is safe: GameState contains no fallibly-serializable
        // values and no non-string map keys.
        serde_json::to_string(&self.state).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> TicTacToe {
        let mut game = TicTacToe::new();
        game.start_game();
        game
    }

    #[test]
    fn initial_state_is_pending_with_x_to_move() {
        let game = TicTacToe::new();
        let state = game.state();
        assert_eq!(state.status, Status::Pending);
        assert_eq!(state.turn, Player::X);
        assert!(state.board.iter().flatten().all(|c| c.0.is_none()));
    }

    #[test]
    fn move_rejected_before_start() {
        let mut game = TicTacToe::new();
        let err = game.make_move(0, 0, Player::X).unwrap_err();
        assert_eq!(err.to_string(), "game is over: pending");
    }

    #[test]
    fn wrong_turn_is_rejected_with_current_turn() {
        let mut game = playing();
        let err = game.make_move(0, 0, Player::O).unwrap_err();
        assert_eq!(err.to_string(), "not O's turn (current turn: X)");
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let mut game = playing();
        let err = game.make_move(3, 0, Player::X).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid position: row=3, col=0 (must be 0-2)"
        );
        let err = game.make_move(0, -1, Player::X).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid position: row=0, col=-1 (must be 0-2)"
        );
    }

    #[test]
    fn occupied_cell_is_rejected() {
        let mut game = playing();
        game.make_move(1, 1, Player::X).unwrap();
        let err = game.make_move(1, 1, Player::O).unwrap_err();
        assert_eq!(err.to_string(), "position already taken");
    }

    #[test]
    fn precondition_order_terminal_before_turn() {
        // After X wins, O's out-of-turn move must report game-over, not
        // wrong-turn.
        let mut game = playing();
        for (row, col, player) in [
            (0, 0, Player::X),
            (1, 0, Player::O),
            (0, 1, Player::X),
            (1, 1, Player::O),
            (0, 2, Player::X),
        ] {
            game.make_move(row, col, player).unwrap();
        }
        assert_eq!(game.state().status, Status::XWins);
        let err = game.make_move(2, 2, Player::X).unwrap_err();
        assert_eq!(err.to_string(), "game is over: X_wins");
    }

    #[test]
    fn turn_toggles_after_non_terminal_move() {
        let mut game = playing();
        game.make_move(0, 0, Player::X).unwrap();
        assert_eq!(game.state().turn, Player::O);
        game.make_move(1, 1, Player::O).unwrap();
        assert_eq!(game.state().turn, Player::X);
    }

    #[test]
    fn column_win_detected() {
        let mut game = playing();
        for (row, col, player) in [
            (0, 2, Player::X),
            (0, 0, Player::O),
            (1, 2, Player::X),
            (1, 0, Player::O),
            (2, 2, Player::X),
        ] {
            game.make_move(row, col, player).unwrap();
        }
        assert_eq!(game.state().status, Status::XWins);
        // Winning move does not toggle the turn.
        assert_eq!(game.state().turn, Player::X);
    }

    #[test]
    fn anti_diagonal_win_detected() {
        let mut game = playing();
        for (row, col, player) in [
            (0, 2, Player::X),
            (0, 0, Player::O),
            (1, 1, Player::X),
            (0, 1, Player::O),
            (2, 0, Player::X),
        ] {
            game.make_move(row, col, player).unwrap();
        }
        assert_eq!(game.state().status, Status::XWins);
    }

    #[test]
    fn full_board_without_winner_is_a_draw() {
        let mut game = playing();
        // X O X / X O O / O X X - no three-in-a-row anywhere.
        for (row, col, player) in [
            (0, 0, Player::X),
            (0, 1, Player::O),
            (0, 2, Player::X),
            (1, 1, Player::O),
            (1, 0, Player::X),
            (1, 2, Player::O),
            (2, 1, Player::X),
            (2, 0, Player::O),
            (2, 2, Player::X),
        ] {
            game.make_move(row, col, player).unwrap();
        }
        assert_eq!(game.state().status, Status::Draw);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = playing();
        game.make_move(0, 0, Player::X).unwrap();
        game.reset();
        let state = game.state();
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn start_game_is_a_no_op_when_terminal() {
        let mut game = playing();
        for (row, col, player) in [
            (0, 0, Player::X),
            (1, 0, Player::O),
            (0, 1, Player::X),
            (1, 1, Player::O),
            (0, 2, Player::X),
        ] {
            game.make_move(row, col, player).unwrap();
        }
        game.start_game();
        assert_eq!(game.state().status, Status::XWins);
    }

    #[test]
    fn format_board_renders_empty_cells_as_underscores() {
        let mut game = playing();
        game.make_move(0, 0, Player::X).unwrap();
        game.make_move(1, 1, Player::O).unwrap();
        assert_eq!(
            game.format_board(),
            "\nX _ _\n_ O _\n_ _ _\nTurn: X | Status: playing\n"
        );
    }

    #[test]
    fn state_json_round_trips() {
        let mut game = playing();
        game.make_move(2, 1, Player::X).unwrap();
        let parsed: GameState = serde_json::from_str(&game.state_json()).unwrap();
        assert_eq!(parsed, game.state());
    }
}
