//! Game sessions and the session manager.
//!
//! A [`Session`] is one 2-player game instance: a boxed engine plus the
//! token -> player admission map, each behind its own lock. The [`Manager`]
//! maps short session ids to live sessions and is the only shared entry
//! point; handlers take the manager lock briefly to obtain an `Arc` to the
//! session and release it before touching session state.

use crate::config::SharedConfig;
use crate::error::Error;
use crate::game::{DynEngine, GameState, Player, TicTacToe};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

/// A `Manager` shared by the listeners and the expiry reaper.
pub type SharedManager = Arc<Manager>;

/// Opaque bearer credential issued at join time. Meaningful only within the
/// session that issued it; whoever holds the token plays its symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerToken(String);

impl PlayerToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlayerToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Draw a fresh identifier: a v4 UUID truncated to `length` characters
/// (hyphenated lowercase form, so at most 36).
fn generate_id(length: usize) -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(length.clamp(1, 36));
    id
}

/// A single game session.
pub struct Session {
    id: String,
    created_at: Instant,
    config: SharedConfig,
    game: RwLock<DynEngine>,
    players: RwLock<HashMap<PlayerToken, Player>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    fn new(id: String, config: SharedConfig) -> Self {
        Session {
            id,
            created_at: Instant::now(),
            config,
            game: RwLock::new(Box::new(TicTacToe::new())),
            players: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Walltime since this session was created. Expiry is anchored here, not
    /// on last activity: a session's total lifetime is bounded.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Admit a player. The first joiner is X, the second O; the second join
    /// also starts the game. Tokens are unique within the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionFull`] once two players have joined.
    pub async fn join(&self) -> Result<(PlayerToken, Player), Error> {
        let mut players = self.players.write().await;
        if players.len() >= 2 {
            return Err(Error::SessionFull);
        }
        let assigned = if players.is_empty() {
            Player::X
        } else {
            Player::O
        };

        let mut token = PlayerToken(generate_id(self.config.player_token_length));
        while players.contains_key(&token) {
            token = PlayerToken(generate_id(self.config.player_token_length));
        }
        players.insert(token.clone(), assigned);

        if players.len() == 2 {
            self.game.write().await.start_game();
        }
        Ok((token, assigned))
    }

    /// Resolve a token to its assigned player.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlayerToken`] for tokens this session never
    /// issued.
    pub async fn player(&self, token: &str) -> Result<Player, Error> {
        self.players
            .read()
            .await
            .get(token)
            .copied()
            .ok_or_else(|| Error::InvalidPlayerToken(token.to_string()))
    }

    pub async fn player_count(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn state(&self) -> GameState {
        self.game.read().await.state()
    }

    pub async fn format_board(&self) -> String {
        self.game.read().await.format_board()
    }

    /// Apply a move for `player`.
    ///
    /// # Errors
    ///
    /// Propagates the engine's precondition errors (game over, wrong turn,
    /// invalid position, position taken).
    pub async fn make_move(&self, row: i32, col: i32, player: Player) -> Result<(), Error> {
        self.game.write().await.make_move(row, col, player)
    }

    /// Reset the board. If two players are still joined the game restarts
    /// immediately; a lone player stays `pending` until a second join or
    /// expiry.
    pub async fn reset_game(&self) {
        self.game.write().await.reset();
        if self.players.read().await.len() == 2 {
            self.game.write().await.start_game();
        }
    }
}

/// Owns every live session, keyed by short id.
pub struct Manager {
    config: SharedConfig,
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl Manager {
    #[must_use]
    pub fn new(config: SharedConfig) -> SharedManager {
        Arc::new(Manager {
            config,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Allocate a session under a fresh unique id and return the id.
    pub async fn create_session(&self) -> String {
        let mut sessions = self.sessions.write().await;
        let id = loop {
            let id = generate_id(self.config.session_id_length);
            if !sessions.contains_key(&id) {
                break id;
            }
        };
        sessions.insert(
            id.clone(),
            Arc::new(Session::new(id.clone(), self.config.clone())),
        );
        id
    }

    /// Look up a live session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] when no session has this id.
    pub async fn session(&self, id: &str) -> Result<Arc<Session>, Error> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Remove a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] when no session has this id.
    pub async fn delete_session(&self, id: &str) -> Result<(), Error> {
        match self.sessions.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(Error::SessionNotFound(id.to_string())),
        }
    }

    /// Ids of all live sessions, in no particular order.
    pub async fn list_sessions(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every session older than `max_age`, returning how many were
    /// dropped.
    pub async fn cleanup_old_sessions(&self, max_age: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.age() <= max_age);
        before - sessions.len()
    }
}
