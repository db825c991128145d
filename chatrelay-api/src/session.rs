//! Per-session thread tracking.
//!
//! Each session id maps to at most one assistant thread. The slot for a
//! session is guarded by its own async mutex so that lazy thread creation
//! happens once even when several requests for the same session race.
//!
//! Sessions idle for longer than `idle_ttl` are forgotten, and the store never
//! holds more than `max_sessions` entries; the least recently seen session is
//! dropped first. A request already holding an evicted slot finishes normally.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use crate::config::SessionConfig;

type ThreadSlot = Arc<Mutex<Option<String>>>;

struct SessionEntry {
    slot: ThreadSlot,
    last_seen: Instant,
}

/// Bounds on how long and how many sessions are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

impl SessionLimits {
    pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(3600);
    pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: Self::DEFAULT_IDLE_TTL,
            max_sessions: Self::DEFAULT_MAX_SESSIONS,
        }
    }
}

impl From<&SessionConfig> for SessionLimits {
    fn from(config: &SessionConfig) -> Self {
        Self {
            idle_ttl: Duration::from_secs(config.idle_ttl_secs),
            max_sessions: config.max_sessions.max(1),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    limits: SessionLimits,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SessionLimits::default())
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            limits,
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.limits.idle_ttl
    }

    /// Slot for the session, refreshing its idle timer. Expired sessions
    /// start over with an empty slot.
    async fn slot(&self, session_id: &str) -> ThreadSlot {
        let now = Instant::now();
        let mut map = self.sessions.write().await;

        if let Some(entry) = map.get_mut(session_id) {
            if !self.is_expired(entry, now) {
                entry.last_seen = now;
                return entry.slot.clone();
            }
        }

        self.evict(&mut map, now);

        let slot: ThreadSlot = Arc::new(Mutex::new(None));
        map.insert(
            session_id.to_string(),
            SessionEntry {
                slot: slot.clone(),
                last_seen: now,
            },
        );
        slot
    }

    /// Drop expired sessions, then the least recently seen ones until there
    /// is room for one more
    fn evict(&self, map: &mut HashMap<String, SessionEntry>, now: Instant) {
        let before = map.len();
        map.retain(|_, entry| !self.is_expired(entry, now));

        while map.len() >= self.limits.max_sessions {
            let oldest = map
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    map.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - map.len();
        if evicted > 0 {
            debug!(evicted, remaining = map.len(), "Evicted idle sessions");
        }
    }

    /// Thread currently tracked for the session, if any
    pub async fn thread_id(&self, session_id: &str) -> Option<String> {
        let slot = {
            let map = self.sessions.read().await;
            let entry = map.get(session_id)?;
            if self.is_expired(entry, Instant::now()) {
                return None;
            }
            entry.slot.clone()
        };
        let guard = slot.lock().await;
        guard.clone()
    }

    /// Track `thread_id` for the session, dropping whatever was there before
    pub async fn replace_thread(&self, session_id: &str, thread_id: String) -> Option<String> {
        let slot = self.slot(session_id).await;
        let mut guard = slot.lock().await;
        guard.replace(thread_id)
    }

    /// Return the session's thread, creating it with `create` when absent.
    ///
    /// The boolean is `true` when `create` ran. The session's slot stays
    /// locked while `create` is awaited; a failed create leaves it empty.
    pub async fn get_or_create_thread<F, Fut, E>(
        &self,
        session_id: &str,
        create: F,
    ) -> Result<(String, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let slot = self.slot(session_id).await;
        let mut guard = slot.lock().await;

        if let Some(thread_id) = guard.as_ref() {
            return Ok((thread_id.clone(), false));
        }

        let thread_id = create().await?;
        *guard = Some(thread_id.clone());
        Ok((thread_id, true))
    }

    /// Number of sessions currently tracked
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
