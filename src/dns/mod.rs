//! Authoritative DNS front-end for the game.
//!
//! The server answers TXT queries inside the configured zone by parsing the
//! sub-domain labels as game commands. A standard stub resolver is the whole
//! client:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +short TXT new.game.local
//! "New session created!
//! Session ID: 1a2b3c4d
//! ..."
//! ```
//!
//! # Zone grammar
//!
//! Relative to the configured zone suffix:
//!
//! ```text
//! new | create                      create a session
//! list | sessions                   list live session ids
//! help | <anything unrecognized>    help text
//! <sid>                             board view (shortcut)
//! <sid>.board | <sid>.status        board view
//! <sid>.join                        join, returns a player token
//! <sid>.reset                       reset the board
//! <sid>.json                        state as JSON
//! <sid>-<token>-move-<row>-<col>    make a move (single label)
//! ```
//!
//! A full game between two terminals:
//!
//! ```bash
//! ❯ dig @127.0.0.1 +short TXT new.game.local
//! ❯ dig @127.0.0.1 +short TXT 1a2b3c4d.join.game.local          # player X
//! ❯ dig @127.0.0.1 +short TXT 1a2b3c4d.join.game.local          # player O
//! ❯ dig @127.0.0.1 +short TXT 1a2b3c4d-9f8e7d6c-move-1-1.game.local
//! ❯ dig @127.0.0.1 +short TXT 1a2b3c4d.board.game.local
//! ```
//!
//! # Answer policy
//!
//! Every answer is authoritative. NS queries for the zone return the
//! configured nameserver (with address glue). Other non-TXT types get an
//! empty NOERROR answer inside the zone; any name outside the zone is
//! NXDOMAIN. Errors below the DNS decoder are dropped without a reply.

mod handlers;
pub mod query;
pub mod response;
pub mod server;

pub use handlers::Handler;
pub use server::new;
