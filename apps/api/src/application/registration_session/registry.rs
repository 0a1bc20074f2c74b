use super::session::RegistrationSession;
use crate::domain::registration::errors::RegistrationError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<RegistrationSession>>;

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: SharedSession,
    last_touched: Instant,
}

/// Open registration forms, keyed by session id.
///
/// A session not looked up for longer than the idle TTL is dropped by
/// [`SessionRegistry::evict_idle`], which also runs on every `create`.
/// Sessions busy submitting are never evicted.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub async fn create(&self) -> SharedSession {
        self.evict_idle(Instant::now()).await;

        let session = RegistrationSession::new();
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            Entry {
                session: shared.clone(),
                last_touched: Instant::now(),
            },
        );
        debug!(session_id = %id, "Registration session opened");
        shared
    }

    /// Looks a session up and refreshes its idle timer.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            debug!(session_id = %id, "Registration session closed");
        }
        removed
    }

    /// Drops every session idle for longer than the TTL as of `now`.
    /// Returns how many were dropped.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let idle = now.saturating_duration_since(entry.last_touched);
            idle <= self.idle_ttl || entry.session.try_lock().is_err()
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Idle registration sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Takes the session without waiting.
///
/// A submission holds this guard until it reaches a terminal state, so the
/// held lock is the form's busy flag: a second trigger while it is held is
/// rejected instead of queued.
pub fn acquire(session: &SharedSession) -> Result<OwnedMutexGuard<RegistrationSession>, RegistrationError> {
    session
        .clone()
        .try_lock_owned()
        .map_err(|_| RegistrationError::SubmissionInProgress)
}
