//! The sub-domain command grammar.
//!
//! The question name, with the zone suffix stripped and lowercased, encodes
//! a game command. Two shapes exist: dotted commands (`new`, `list`,
//! `<sid>.join`, ...) and the single-label hyphen move
//! (`<sid>-<token>-move-<row>-<col>`). Hyphen-move detection runs first,
//! keyed on the `-move-` substring; a malformed hyphen form falls through to
//! dotted parsing. Shapes that parse as nothing at all become the help
//! command rather than an error.

use crate::error::Error;
use trust_dns_server::client::rr::LowerName;

/// Session ids are well-formed at 4-36 characters. Generated ids default to
/// 8, but a hand-crafted id in this range is accepted and simply fails
/// lookup if no session has it.
pub(crate) fn session_id_is_valid(id: &str) -> bool {
    (4..=36).contains(&id.len())
}

/// A recognized command word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `new` | `create`: allocate a session.
    New,
    /// `list` | `sessions`: list live session ids.
    List,
    /// `help`, the empty remainder, or anything unrecognizable.
    Help,
    /// `<sid>.join`: admission.
    Join,
    /// `<sid>`, `<sid>.board`, `<sid>.status`: board view.
    Board,
    /// `<sid>.reset`.
    Reset,
    /// `<sid>.json`.
    Json,
    /// Hyphen move, or a dotted `move-...` keyword.
    Move,
    /// A well-formed session id followed by an unknown keyword.
    Unknown,
}

impl Command {
    fn parse(word: &str) -> Command {
        match word {
            "new" | "create" => Command::New,
            "list" | "sessions" => Command::List,
            "help" | "" => Command::Help,
            "join" => Command::Join,
            "board" | "status" => Command::Board,
            "reset" => Command::Reset,
            "json" => Command::Json,
            _ if word.starts_with("move-") => Command::Move,
            _ => Command::Unknown,
        }
    }

    pub(crate) fn is_session_management(self) -> bool {
        matches!(self, Command::New | Command::List | Command::Help)
    }

    pub(crate) fn is_game_command(self) -> bool {
        matches!(
            self,
            Command::Join | Command::Board | Command::Reset | Command::Json | Command::Move
        )
    }
}

/// Move coordinates as written in the query. Range validation is the
/// engine's job, so out-of-range values flow through and come back as
/// `invalid position` errors with the board attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveParams {
    pub row: i32,
    pub col: i32,
}

/// A parsed query, ready for dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub session_id: Option<String>,
    pub token: Option<String>,
    pub command: Command,
    pub move_params: Option<MoveParams>,
    /// The pre-zone remainder as written, for error messages.
    pub raw: String,
}

impl Query {
    fn help(raw: &str) -> Query {
        Query {
            session_id: None,
            token: None,
            command: Command::Help,
            move_params: None,
            raw: raw.to_string(),
        }
    }

    pub(crate) fn is_session_management(&self) -> bool {
        self.session_id.is_none() && self.command.is_session_management()
    }

    pub(crate) fn is_game_command(&self) -> bool {
        self.session_id.is_some() && self.command.is_game_command()
    }
}

/// Parse a question name against the configured zone.
///
/// # Errors
///
/// Returns [`Error::ZoneMismatch`] when `qname` is not within `zone`; the
/// responder turns that into NXDOMAIN.
pub fn parse(qname: &LowerName, zone: &LowerName) -> Result<Query, Error> {
    if !zone.zone_of(qname) {
        return Err(Error::ZoneMismatch {
            qname: qname.to_string(),
            zone: zone.to_string(),
        });
    }

    // LowerName renders lowercased; strip the zone suffix textually.
    let qname = qname.to_string();
    let zone = zone.to_string();
    let remainder = qname
        .strip_suffix(zone.as_str())
        .unwrap_or("")
        .trim_end_matches('.');

    Ok(parse_remainder(remainder))
}

fn parse_remainder(remainder: &str) -> Query {
    // Bare keywords are session management regardless of any further shape.
    let command = Command::parse(remainder);
    if command.is_session_management() {
        return Query {
            session_id: None,
            token: None,
            command,
            move_params: None,
            raw: remainder.to_string(),
        };
    }

    if remainder.contains("-move-") {
        if let Some(query) = parse_hyphen_move(remainder) {
            return query;
        }
    }

    parse_dotted(remainder)
}

/// Shape B: `<sid>-<token>-move-<row>-<col>`, exactly five hyphen-separated
/// fields with the literal `move` third. Anything else falls back to dotted
/// parsing.
fn parse_hyphen_move(remainder: &str) -> Option<Query> {
    let parts: Vec<&str> = remainder.split('-').collect();
    if parts.len() != 5 || parts[2] != "move" {
        return None;
    }
    if !session_id_is_valid(parts[0]) {
        return None;
    }
    let row: i32 = parts[3].parse().ok()?;
    let col: i32 = parts[4].parse().ok()?;

    Some(Query {
        session_id: Some(parts[0].to_string()),
        token: (!parts[1].is_empty()).then(|| parts[1].to_string()),
        command: Command::Move,
        move_params: Some(MoveParams { row, col }),
        raw: remainder.to_string(),
    })
}

/// Shape A: `<sid>` alone, or `<sid>.<keyword>`.
fn parse_dotted(remainder: &str) -> Query {
    let Some((first, rest)) = remainder.split_once('.') else {
        // A single label: a board view if it looks like a session id.
        if session_id_is_valid(remainder) {
            return Query {
                session_id: Some(remainder.to_string()),
                token: None,
                command: Command::Board,
                move_params: None,
                raw: remainder.to_string(),
            };
        }
        return Query::help(remainder);
    };

    if !session_id_is_valid(first) {
        return Query::help(remainder);
    }

    let command = Command::parse(rest);
    // The dotted move form `move-<row>-<col>-<token>` is kept for
    // compatibility with the session-created examples; its token field is
    // not treated as the caller's token, so the move is answered with the
    // token-required error once the session is live.
    let move_params = match command {
        Command::Move => parse_dotted_move_params(rest),
        _ => None,
    };

    Query {
        session_id: Some(first.to_string()),
        token: None,
        command,
        move_params,
        raw: remainder.to_string(),
    }
}

fn parse_dotted_move_params(keyword: &str) -> Option<MoveParams> {
    let parts: Vec<&str> = keyword.split('-').collect();
    if parts.len() != 4 || parts[0] != "move" || parts[3].is_empty() {
        return None;
    }
    let row: i32 = parts[1].parse().ok()?;
    let col: i32 = parts[2].parse().ok()?;
    Some(MoveParams { row, col })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn zone() -> LowerName {
        LowerName::from_str("game.local.").unwrap()
    }

    fn parse_name(qname: &str) -> Result<Query, Error> {
        parse(&LowerName::from_str(qname).unwrap(), &zone())
    }

    #[test]
    fn off_zone_names_are_rejected() {
        let err = parse_name("foo.example.com.").unwrap_err();
        assert!(matches!(err, Error::ZoneMismatch { .. }));
    }

    #[test]
    fn bare_zone_is_help() {
        let query = parse_name("game.local.").unwrap();
        assert_eq!(query.command, Command::Help);
        assert!(query.is_session_management());
    }

    #[test]
    fn management_keywords() {
        for (label, command) in [
            ("new", Command::New),
            ("create", Command::New),
            ("list", Command::List),
            ("sessions", Command::List),
            ("help", Command::Help),
        ] {
            let query = parse_name(&format!("{label}.game.local.")).unwrap();
            assert_eq!(query.command, command, "{label}");
            assert!(query.is_session_management());
            assert_eq!(query.session_id, None);
        }
    }

    #[test]
    fn qnames_match_case_insensitively() {
        let query = parse_name("NEW.Game.LOCAL.").unwrap();
        assert_eq!(query.command, Command::New);
    }

    #[test]
    fn bare_session_id_is_a_board_view() {
        let query = parse_name("abc12345.game.local.").unwrap();
        assert_eq!(query.command, Command::Board);
        assert_eq!(query.session_id.as_deref(), Some("abc12345"));
        assert!(query.is_game_command());
    }

    #[test]
    fn short_label_falls_back_to_help() {
        let query = parse_name("abc.game.local.").unwrap();
        assert_eq!(query.command, Command::Help);
        assert_eq!(query.session_id, None);
    }

    #[test]
    fn dotted_session_commands() {
        for (keyword, command) in [
            ("join", Command::Join),
            ("board", Command::Board),
            ("status", Command::Board),
            ("reset", Command::Reset),
            ("json", Command::Json),
        ] {
            let query = parse_name(&format!("abc12345.{keyword}.game.local.")).unwrap();
            assert_eq!(query.command, command, "{keyword}");
            assert_eq!(query.session_id.as_deref(), Some("abc12345"));
        }
    }

    #[test]
    fn unknown_keyword_with_valid_sid() {
        let query = parse_name("abc12345.frobnicate.game.local.").unwrap();
        assert_eq!(query.command, Command::Unknown);
        assert!(!query.is_game_command());
        assert!(!query.is_session_management());
    }

    #[test]
    fn hyphen_move_parses_all_fields() {
        let query = parse_name("abc12345-tok45678-move-1-2.game.local.").unwrap();
        assert_eq!(query.command, Command::Move);
        assert_eq!(query.session_id.as_deref(), Some("abc12345"));
        assert_eq!(query.token.as_deref(), Some("tok45678"));
        assert_eq!(query.move_params, Some(MoveParams { row: 1, col: 2 }));
        assert_eq!(query.raw, "abc12345-tok45678-move-1-2");
    }

    #[test]
    fn hyphen_move_keeps_out_of_range_coordinates() {
        // Range checking belongs to the engine, not the grammar.
        let query = parse_name("abc12345-tok45678-move-9-7.game.local.").unwrap();
        assert_eq!(query.move_params, Some(MoveParams { row: 9, col: 7 }));
    }

    #[test]
    fn hyphen_move_with_empty_token_has_no_token() {
        let query = parse_name("abc12345--move-1-1.game.local.").unwrap();
        assert_eq!(query.command, Command::Move);
        assert_eq!(query.token, None);
    }

    #[test]
    fn malformed_hyphen_move_falls_through_to_dotted() {
        // Six fields: not a hyphen move; the whole label is too long to be a
        // session id only if >36 chars, here it parses as a board view.
        let query = parse_name("abc12345-tok-move-1-2-3.game.local.").unwrap();
        assert_eq!(query.command, Command::Board);
        assert_eq!(
            query.session_id.as_deref(),
            Some("abc12345-tok-move-1-2-3")
        );

        // Non-numeric coordinates: same fall-through.
        let query = parse_name("abc12345-tok45678-move-x-y.game.local.").unwrap();
        assert_eq!(query.command, Command::Board);
    }

    #[test]
    fn dotted_move_keeps_params_but_not_token() {
        let query = parse_name("abc12345.move-1-2-tok45678.game.local.").unwrap();
        assert_eq!(query.command, Command::Move);
        assert_eq!(query.session_id.as_deref(), Some("abc12345"));
        assert_eq!(query.move_params, Some(MoveParams { row: 1, col: 2 }));
        assert_eq!(query.token, None);
    }

    #[test]
    fn malformed_dotted_move_has_no_params() {
        let query = parse_name("abc12345.move-1.game.local.").unwrap();
        assert_eq!(query.command, Command::Move);
        assert_eq!(query.move_params, None);
    }

    #[test]
    fn deep_dotted_garbage_is_unknown() {
        let query = parse_name("abc12345.foo.bar.game.local.").unwrap();
        assert_eq!(query.command, Command::Unknown);
        assert_eq!(query.session_id.as_deref(), Some("abc12345"));
    }
}
