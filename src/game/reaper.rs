//! Background expiry of old sessions.

use crate::game::SharedManager;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodic task that removes sessions past their maximum age.
///
/// Age is measured from session creation, so the reaper bounds total session
/// lifetime regardless of activity. The task runs until its cancellation
/// token fires; a tick that removes nothing is silent at `info` level.
pub struct SessionReaper {
    sessions: SharedManager,
    interval: Duration,
    max_age: Duration,
    shutdown: CancellationToken,
}

impl SessionReaper {
    #[must_use]
    pub fn new(sessions: SharedManager, interval: Duration, max_age: Duration) -> Self {
        SessionReaper {
            sessions,
            interval,
            max_age,
            shutdown: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Spawn the reaper loop onto the runtime.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "session reaper running every {:?} (max age {:?})",
                self.interval, self.max_age
            );
            let mut tick = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("session reaper: shutting down");
                        break;
                    }
                    _ = tick.tick() => {
                        let removed = self.sessions.cleanup_old_sessions(self.max_age).await;
                        if removed > 0 {
                            info!("expired {removed} session(s)");
                        } else {
                            debug!("reaper tick: nothing to expire");
                        }
                    }
                }
            }
        })
    }
}
