//! DNS Tic-Tac-Toe
//!
//! A networked multi-player tic-tac-toe service whose only request/response
//! channel is the DNS protocol. Game commands travel inside DNS question
//! names; results come back as TXT record payloads, so `dig` is a complete
//! client:
//!
//! ```bash
//! ❯ dig @127.0.0.1 +short TXT new.game.local
//! ❯ dig @127.0.0.1 +short TXT <session-id>.join.game.local
//! ❯ dig @127.0.0.1 +short TXT <session-id>-<token>-move-1-1.game.local
//! ```
//!
//! See the [`dns`] module for the full zone grammar and the [`game`] module
//! for session and engine semantics. All state is in memory; sessions expire
//! on a fixed age ceiling enforced by a background reaper.
//!
#![warn(clippy::pedantic)]

pub mod config;
pub mod dns;
pub mod error;
pub mod game;

pub use config::{Config, SharedConfig};
pub use dns::new as new_dns;
pub use error::Error;
pub use game::{Manager, SessionReaper, SharedManager};
