use crate::config::SharedConfig;
use crate::dns::query::{self, Command, Query};
use crate::dns::response;
use crate::error::Error;
use crate::game::{Session, SharedManager, Status};
use std::net::IpAddr;
use tracing::{debug, error};
use trust_dns_server::authority::MessageResponseBuilder;
use trust_dns_server::client::op::{Header, MessageType, OpCode, ResponseCode};
use trust_dns_server::client::rr::rdata::TXT;
use trust_dns_server::client::rr::{RData, Record, RecordType};
use trust_dns_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};

/// One character-string of a TXT record holds at most 255 bytes.
const TXT_CHARACTER_STRING_MAX: usize = 255;

/// Serves both the UDP and TCP listeners. Each request is routed by query
/// type; TXT questions inside the zone are parsed as game commands and
/// answered with a TXT payload, everything else follows the on-zone/off-zone
/// rcode rules.
#[derive(Clone)]
pub struct Handler {
    config: SharedConfig,
    sessions: SharedManager,
    zone_example: String,
}

impl Handler {
    #[must_use]
    pub fn new(config: SharedConfig, sessions: SharedManager) -> Self {
        let zone_example = config.zone_example();
        Handler {
            config,
            sessions,
            zone_example,
        }
    }

    /// Produce the TXT payload for a parsed query. This is the whole command
    /// surface of the service; the DNS encoding around it lives in the
    /// `handle_request_*` methods.
    pub async fn execute(&self, query: &Query) -> String {
        if query.is_session_management() {
            return self.execute_session_management(query).await;
        }
        if query.is_game_command() {
            return self.execute_game_command(query).await;
        }
        response::help(&self.zone_example)
    }

    async fn execute_session_management(&self, query: &Query) -> String {
        match query.command {
            Command::New => {
                let id = self.sessions.create_session().await;
                debug!("created session {id}");
                response::session_created(&id, &self.zone_example)
            }
            Command::List => {
                let ids = self.sessions.list_sessions().await;
                response::session_list(&ids, &self.zone_example)
            }
            _ => response::help(&self.zone_example),
        }
    }

    async fn execute_game_command(&self, query: &Query) -> String {
        let Some(id) = query.session_id.as_deref() else {
            return response::help(&self.zone_example);
        };
        let session = match self.sessions.session(id).await {
            Ok(session) => session,
            Err(err) => {
                return response::error_with_context(
                    &err,
                    &format!("\nCreate a new session with: new.{}", self.zone_example),
                );
            }
        };

        match query.command {
            Command::Join => match session.join().await {
                Ok((token, player)) => {
                    response::join_success(id, token.as_str(), player, &self.zone_example)
                }
                Err(err) => response::error(&err),
            },
            Command::Board => response::board(id, &session.format_board().await),
            Command::Reset => {
                session.reset_game().await;
                response::reset(id, &session.format_board().await)
            }
            Command::Json => Self::state_json(&session).await,
            Command::Move => self.execute_move(query, id, &session).await,
            _ => response::help(&self.zone_example),
        }
    }

    /// JSON view of the session. The status field reports `pending` until
    /// both players have joined, whatever the engine says internally.
    async fn state_json(session: &Session) -> String {
        let mut state = session.state().await;
        if session.player_count().await < 2 {
            state.status = Status::Pending;
        }
        // NB: unwrap is safe: GameState contains no fallibly-serializable
        // values and no non-string map keys.
        serde_json::to_string(&state).unwrap()
    }

    async fn execute_move(&self, query: &Query, id: &str, session: &Session) -> String {
        let Some(params) = query.move_params else {
            return response::error(&Error::InvalidMoveFormat(query.raw.clone()));
        };
        if session.player_count().await < 2 {
            return response::error(&Error::WaitingForPlayers);
        }
        let Some(token) = query.token.as_deref() else {
            return response::error(&Error::TokenRequired);
        };
        let player = match session.player(token).await {
            Ok(player) => player,
            Err(err) => return response::error(&err),
        };

        match session.make_move(params.row, params.col, player).await {
            Ok(()) => response::move_accepted(id, &session.format_board().await),
            Err(err) => response::move_error(id, &err, &session.format_board().await),
        }
    }

    async fn dispatch_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response: R,
    ) -> Result<ResponseInfo, Error> {
        // If it isn't a query, return NOTIMPL.
        if request.op_code() != OpCode::Query || request.message_type() != MessageType::Query {
            return self.handle_notimpl(request, response).await;
        }

        match request.query().query_type() {
            RecordType::NS => self.handle_request_ns(request, response).await,
            RecordType::TXT => self.handle_request_txt(request, response).await,
            _ => self.handle_request_other(request, response).await,
        }
    }

    async fn handle_notimpl<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let response = MessageResponseBuilder::from_message_request(request);
        Ok(response_handle
            .send_response(response.error_msg(request.header(), ResponseCode::NotImp))
            .await?)
    }

    /// NS queries: a single NS record for the zone (with address glue), or
    /// NXDOMAIN off-zone.
    async fn handle_request_ns<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let query_name = request.query().name();
        if !self.config.zone.zone_of(query_name) {
            return self.send_nxdomain(request, response_handle).await;
        }

        let answers = vec![Record::from_rdata(
            query_name.into(),
            self.config.ttl,
            RData::NS(self.config.ns_hostname.clone()),
        )];
        let glue = match self.config.ns_ip {
            IpAddr::V4(addr) => RData::A(addr),
            IpAddr::V6(addr) => RData::AAAA(addr),
        };
        let additionals = vec![Record::from_rdata(
            self.config.ns_hostname.clone(),
            self.config.ttl,
            glue,
        )];
        self.send_auth_resp(request, response_handle, answers, additionals)
            .await
    }

    /// Non-TXT, non-NS queries: NODATA inside the zone, NXDOMAIN outside.
    async fn handle_request_other<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        if self.config.zone.zone_of(request.query().name()) {
            return self
                .send_auth_resp(request, response_handle, vec![], vec![])
                .await;
        }
        self.send_nxdomain(request, response_handle).await
    }

    async fn handle_request_txt<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let query_name = request.query().name();
        let query = match query::parse(query_name, &self.config.zone) {
            Ok(query) => query,
            Err(_) => return self.send_nxdomain(request, response_handle).await,
        };

        debug!(
            "handling query: raw=\"{}\" command={:?} session={:?}",
            query.raw, query.command, query.session_id
        );
        let payload = self.execute(&query).await;
        let answers = vec![Record::from_rdata(
            query_name.into(),
            self.config.ttl,
            RData::TXT(TXT::new(txt_character_strings(&payload))),
        )];
        self.send_auth_resp(request, response_handle, answers, vec![])
            .await
    }

    async fn send_auth_resp<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        answers: Vec<Record>,
        additionals: Vec<Record>,
    ) -> Result<ResponseInfo, Error> {
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, answers.iter(), &[], &[], additionals.iter());
        Ok(response_handle.send_response(response).await?)
    }

    async fn send_nxdomain<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let builder = MessageResponseBuilder::from_message_request(request);
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        header.set_response_code(ResponseCode::NXDomain);
        let response = builder.build_no_records(header);
        Ok(response_handle.send_response(response).await?)
    }
}

/// Split a payload into TXT character-strings of at most 255 bytes. Clients
/// concatenate multi-string records back together. Payloads are ASCII, so
/// byte chunking never lands inside a code point.
fn txt_character_strings(payload: &str) -> Vec<String> {
    if payload.is_empty() {
        return vec![String::new()];
    }
    payload
        .as_bytes()
        .chunks(TXT_CHARACTER_STRING_MAX)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

#[async_trait::async_trait]
impl RequestHandler for Handler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        match self.dispatch_request(request, response_handle).await {
            Ok(info) => info,
            Err(err) => {
                error!("error in RequestHandler: {err:?}");
                let mut header = Header::new();
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}
