use crate::config::SessionConfig;
use crate::models::Session;
use crate::snapshot::{SnapshotStore, EXPIRES_AT_KEY, IDENTITY_KEY, LOGGED_IN_KEY};
use auth_identity::{Clock, Identity};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type LogoutHandler = Arc<dyn Fn(&Identity) + Send + Sync>;

#[derive(Default)]
struct ManagerState {
    session: Option<Session>,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every establish/touch/clear. A pending timer only fires
    /// if its generation still matches, so a stale timer can never log
    /// out a session it did not schedule.
    generation: u64,
}

struct Inner {
    state: Mutex<ManagerState>,
    clock: Arc<dyn Clock>,
    snapshot: Arc<dyn SnapshotStore>,
    config: SessionConfig,
    on_logout: Mutex<Option<LogoutHandler>>,
}

/// Owns the single active session: NoSession -> Active -> (expired or
/// cleared) -> NoSession.
///
/// Expiry is enforced by a scheduled task rather than checked lazily,
/// because it must trigger the logout side effect without waiting for
/// another call from the user.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(
        clock: Arc<dyn Clock>,
        snapshot: Arc<dyn SnapshotStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(ManagerState::default()),
                clock,
                snapshot,
                config,
                on_logout: Mutex::new(None),
            }),
        }
    }

    /// Register the handler invoked (exactly once) when a session expires.
    pub fn set_logout_handler<F>(&self, handler: F)
    where
        F: Fn(&Identity) + Send + Sync + 'static,
    {
        *self.inner.on_logout.lock() = Some(Arc::new(handler));
    }

    fn lifetime(&self) -> Duration {
        Duration::minutes(self.inner.config.lifetime_minutes)
    }

    /// Start a session for `identity`, replacing any current one.
    pub fn establish(&self, identity: Identity) -> Session {
        let now = self.inner.clock.now();
        let session = Session {
            identity,
            created_at: now,
            expires_at: now + self.lifetime(),
        };

        {
            let mut state = self.inner.state.lock();
            state.session = Some(session.clone());
            Inner::arm(&self.inner, &mut state, session.expires_at);
        }
        Inner::write_snapshot(&self.inner.snapshot, &session);

        info!(
            user_id = %session.identity.id,
            expires_at = %session.expires_at,
            "session established"
        );
        session
    }

    /// Push the expiry forward on observed activity. No-op unless Active.
    pub fn touch(&self) -> bool {
        let now = self.inner.clock.now();
        let renewed = {
            let mut state = self.inner.state.lock();
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            session.expires_at = now + self.lifetime();
            session.identity.last_active_at = Some(now);
            let renewed = session.clone();
            let expires_at = renewed.expires_at;
            Inner::arm(&self.inner, &mut state, expires_at);
            renewed
        };
        Inner::write_snapshot(&self.inner.snapshot, &renewed);
        debug!(expires_at = %renewed.expires_at, "session renewed");
        true
    }

    /// Drop any session and cancel the pending expiry timer.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.lock();
            state.generation = state.generation.wrapping_add(1);
            if let Some(handle) = state.timer.take() {
                handle.abort();
            }
            state.session = None;
        }
        Inner::clear_snapshot(&self.inner.snapshot);
    }

    /// Remove the persisted snapshot even when no live session exists.
    pub fn purge_snapshot(&self) {
        Inner::clear_snapshot(&self.inner.snapshot);
    }

    /// Resume a session from a persisted snapshot, if it is complete,
    /// well-formed and unexpired. Anything else is discarded.
    pub fn restore(&self) -> Option<Identity> {
        let snapshot = &self.inner.snapshot;
        let flag = snapshot.get(LOGGED_IN_KEY);
        let identity_json = snapshot.get(IDENTITY_KEY);
        let expires_raw = snapshot.get(EXPIRES_AT_KEY);

        let (Some(flag), Some(identity_json), Some(expires_raw)) =
            (flag, identity_json, expires_raw)
        else {
            // Missing pieces: treat as no session and drop any leftovers.
            Inner::clear_snapshot(snapshot);
            return None;
        };

        if flag != "true" {
            Inner::clear_snapshot(snapshot);
            return None;
        }
        let Ok(identity) = serde_json::from_str::<Identity>(&identity_json) else {
            Inner::clear_snapshot(snapshot);
            return None;
        };
        let Ok(parsed) = DateTime::parse_from_rfc3339(&expires_raw) else {
            Inner::clear_snapshot(snapshot);
            return None;
        };
        let expires_at = parsed.with_timezone(&Utc);

        let now = self.inner.clock.now();
        if expires_at <= now {
            debug!(user_id = %identity.id, "persisted session already expired, discarding");
            Inner::clear_snapshot(snapshot);
            return None;
        }

        let session = Session {
            identity: identity.clone(),
            created_at: now,
            expires_at,
        };
        {
            let mut state = self.inner.state.lock();
            state.session = Some(session);
            Inner::arm(&self.inner, &mut state, expires_at);
        }

        info!(user_id = %identity.id, expires_at = %expires_at, "session restored from snapshot");
        Some(identity)
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.state.lock().session.clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.state.lock().session.is_some()
    }
}

impl Inner {
    /// Cancel the previous timer and schedule a new one for `expires_at`.
    /// Must run under the state lock so the generation bump, the abort and
    /// the new spawn are one atomic step relative to other transitions.
    fn arm(inner: &Arc<Inner>, state: &mut ManagerState, expires_at: DateTime<Utc>) {
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        if let Some(handle) = state.timer.take() {
            handle.abort();
        }

        let delay = (expires_at - inner.clock.now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        let task_inner = Arc::clone(inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Inner::fire_expiry(task_inner, generation);
        }));
    }

    fn fire_expiry(inner: Arc<Inner>, generation: u64) {
        let expired = {
            let mut state = inner.state.lock();
            if state.generation != generation {
                // A later establish/touch/clear superseded this timer.
                return;
            }
            state.timer = None;
            state.session.take()
        };
        let Some(session) = expired else {
            return;
        };

        Inner::clear_snapshot(&inner.snapshot);
        warn!(user_id = %session.identity.id, "session expired, forcing logout");

        let handler = inner.on_logout.lock().clone();
        if let Some(handler) = handler {
            handler(&session.identity);
        }
    }

    fn write_snapshot(snapshot: &Arc<dyn SnapshotStore>, session: &Session) {
        // Identity serialization omits the credential hash and MFA secret.
        let Ok(identity_json) = serde_json::to_string(&session.identity) else {
            return;
        };
        snapshot.set(IDENTITY_KEY, &identity_json);
        snapshot.set(EXPIRES_AT_KEY, &session.expires_at.to_rfc3339());
        snapshot.set(LOGGED_IN_KEY, "true");
    }

    fn clear_snapshot(snapshot: &Arc<dyn SnapshotStore>) {
        snapshot.remove(IDENTITY_KEY);
        snapshot.remove(EXPIRES_AT_KEY);
        snapshot.remove(LOGGED_IN_KEY);
    }
}
