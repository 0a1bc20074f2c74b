use crate::application::registration_session::SessionRegistry;
use std::{sync::Arc, time::Duration, time::Instant};

/// Periodically drops registration sessions that have sat idle past the
/// registry's TTL.
pub struct SessionSweeper {
    sessions: Arc<SessionRegistry>,
    interval_seconds: u64,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<SessionRegistry>, interval_seconds: u64) -> Self {
        Self {
            sessions,
            interval_seconds: interval_seconds.max(1),
        }
    }

    pub async fn start(&self) {
        tracing::info!(
            interval_seconds = self.interval_seconds,
            idle_ttl_seconds = self.sessions.idle_ttl().as_secs(),
            "Session sweeper started"
        );
        loop {
            tokio::time::sleep(Duration::from_secs(self.interval_seconds)).await;
            self.sweep_once().await;
        }
    }

    pub async fn sweep_once(&self) -> usize {
        self.sessions.evict_idle(Instant::now()).await
    }
}
