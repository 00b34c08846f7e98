use crate::error::Error;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_server::client::rr::{LowerName, Name};

pub type SharedConfig = Arc<Config>;

/// Runtime configuration, loaded from environment variables at startup.
///
/// Every variable has a default; any variable that is present but fails to
/// parse aborts startup. The zone and nameserver host are normalized to
/// fully-qualified names (trailing dot) so suffix matching against question
/// names is well-defined.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zone served by this server, e.g. `game.local.`.
    pub zone: LowerName,
    /// UDP/TCP listen port.
    pub port: u16,
    /// TTL for TXT answers. 0 by default, disabling downstream caching on
    /// resolvers that honor it.
    pub ttl: u32,
    /// Idle timeout applied to TCP connections.
    pub tcp_timeout: Duration,
    /// Host named in NS answers for the zone.
    pub ns_hostname: Name,
    /// Address served as glue for [`Config::ns_hostname`].
    pub ns_ip: IpAddr,
    /// Length of generated session ids (capped at the 36-char UUID form).
    pub session_id_length: usize,
    /// Length of generated player tokens (same cap).
    pub player_token_length: usize,
    /// Sessions older than this are removed, measured from creation time.
    pub session_max_age: Duration,
    /// How often the expiry reaper runs.
    pub session_cleanup_interval: Duration,
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] naming the offending variable if any
    /// value fails to parse.
    pub fn try_from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup. Tests feed this
    /// closures over fixed maps instead of mutating the process environment.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let zone = fqdn(&raw(&lookup, "DNS_ZONE", "game.local"));
        let zone: Name = zone
            .parse()
            .map_err(|err| invalid("DNS_ZONE", &err))?;

        let ns_hostname = fqdn(&raw(&lookup, "NS_HOSTNAME", "localhost"));
        let ns_hostname: Name = ns_hostname
            .parse()
            .map_err(|err| invalid("NS_HOSTNAME", &err))?;

        Ok(Config {
            zone: zone.into(),
            port: parsed(&lookup, "DNS_PORT", "53")?,
            ttl: parsed(&lookup, "DNS_TTL", "0")?,
            tcp_timeout: duration(&lookup, "DNS_TCP_TIMEOUT", "5s")?,
            ns_hostname,
            ns_ip: parsed(&lookup, "NS_IP", "127.0.0.1")?,
            session_id_length: parsed(&lookup, "SESSION_ID_LENGTH", "8")?,
            player_token_length: parsed(&lookup, "PLAYER_TOKEN_LENGTH", "8")?,
            session_max_age: duration(&lookup, "SESSION_MAX_AGE", "120s")?,
            session_cleanup_interval: duration(
                &lookup,
                "SESSION_CLEANUP_INTERVAL",
                "120s",
            )?,
        })
    }

    /// Listen address shared by the UDP and TCP listeners.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// The zone without its trailing dot, as shown in client-facing examples
    /// (`new.game.local`).
    #[must_use]
    pub fn zone_example(&self) -> String {
        let zone = self.zone.to_string();
        zone.trim_end_matches('.').to_string()
    }
}

fn raw(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: &str) -> String {
    lookup(var).unwrap_or_else(|| default.to_string())
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    raw(lookup, var, default)
        .parse()
        .map_err(|err| invalid(var, &err))
}

fn duration(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<Duration, Error> {
    humantime::parse_duration(&raw(lookup, var, default)).map_err(|err| invalid(var, &err))
}

fn invalid(var: &'static str, err: &impl Display) -> Error {
    Error::InvalidEnv {
        var,
        reason: err.to_string(),
    }
}

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.zone.to_string(), "game.local.");
        assert_eq!(config.port, 53);
        assert_eq!(config.ttl, 0);
        assert_eq!(config.ns_hostname.to_string(), "localhost.");
        assert_eq!(config.ns_ip.to_string(), "127.0.0.1");
        assert_eq!(config.session_id_length, 8);
        assert_eq!(config.player_token_length, 8);
        assert_eq!(config.session_max_age, Duration::from_secs(120));
        assert_eq!(config.session_cleanup_interval, Duration::from_secs(120));
    }

    #[test]
    fn zone_gains_trailing_dot() {
        let config = from_vars(&[("DNS_ZONE", "play.example.com")]).unwrap();
        assert_eq!(config.zone.to_string(), "play.example.com.");
        assert_eq!(config.zone_example(), "play.example.com");
    }

    #[test]
    fn overrides_parse() {
        let config = from_vars(&[
            ("DNS_PORT", "5353"),
            ("DNS_TTL", "30"),
            ("SESSION_MAX_AGE", "10m"),
            ("NS_IP", "::1"),
        ])
        .unwrap();
        assert_eq!(config.port, 5353);
        assert_eq!(config.ttl, 30);
        assert_eq!(config.session_max_age, Duration::from_secs(600));
        assert!(config.ns_ip.is_ipv6());
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = from_vars(&[("DNS_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("DNS_PORT"));
    }

    #[test]
    fn bare_number_duration_is_rejected() {
        let err = from_vars(&[("SESSION_MAX_AGE", "120")]).unwrap_err();
        assert!(err.to_string().contains("SESSION_MAX_AGE"));
    }
}
