use crate::config::SharedConfig;
use crate::dns::handlers::Handler;
use crate::game::SharedManager;
use tokio::net::{TcpListener, UdpSocket};
use trust_dns_server::ServerFuture;

/// Build the DNS server: one [`Handler`] registered on a UDP socket and a
/// TCP listener at the configured bind address.
///
/// # Errors
///
/// Returns an error if either bind fails.
pub async fn new(
    config: SharedConfig,
    sessions: SharedManager,
) -> anyhow::Result<ServerFuture<Handler>> {
    let bind_addr = config.bind_addr();
    let tcp_timeout = config.tcp_timeout;
    let dns_handler = Handler::new(config, sessions);
    let mut dns_server = ServerFuture::new(dns_handler);
    dns_server.register_socket(UdpSocket::bind(bind_addr).await?);
    dns_server.register_listener(TcpListener::bind(bind_addr).await?, tcp_timeout);
    Ok(dns_server)
}
