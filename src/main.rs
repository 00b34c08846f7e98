use anyhow::Result;
use std::sync::Arc;
use tictacdns::config::Config;
use tictacdns::error::Error::DNSError;
use tictacdns::game::{Manager, SessionReaper};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = Arc::new(Config::try_from_env()?);
    let sessions = Manager::new(config.clone());

    let shutdown = CancellationToken::new();
    let _reaper = SessionReaper::new(
        sessions.clone(),
        config.session_cleanup_interval,
        config.session_max_age,
    )
    .with_cancellation(shutdown.clone())
    .start();

    tracing::info!(
        "zone {} listening on UDP/TCP {}",
        config.zone,
        config.bind_addr()
    );
    let dns_server = tictacdns::dns::server::new(config.clone(), sessions).await?;
    let dns_handle = tokio::spawn(dns_server.block_until_done());

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        Ok(dns_res) = dns_handle => {
            if let Err(err) = dns_res {
                shutdown.cancel();
                return Err(DNSError(err).into());
            }
        }
    }
    shutdown.cancel();
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tictacdns=info".into()),
        )
        .init();
}
