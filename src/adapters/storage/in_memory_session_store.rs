//! In-Memory Session Store Adapter
//!
//! Keeps intake sessions in a process-local map. Each entry carries a turn
//! gate (an async mutex) that serializes turns for its key. Gates are cloned
//! out of the map before waiting on them, so a slow turn never blocks the map.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::SessionKey;
use crate::domain::intake::{HistoryEntry, IntakeSession, SessionUpdate, DEFAULT_HISTORY_LIMIT};
use crate::ports::{SessionStore, SessionStoreError, TurnLease};

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Entry {
    session: IntakeSession,
    gate: Arc<Mutex<()>>,
    last_seen: Instant,
}

impl Entry {
    fn new(session: IntakeSession) -> Self {
        Self {
            session,
            gate: Arc::new(Mutex::new(())),
            last_seen: Instant::now(),
        }
    }

    /// A turn holds or waits on the gate.
    fn in_flight(&self) -> bool {
        Arc::strong_count(&self.gate) > 1
    }

    fn seen(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// In-memory session store.
///
/// Clones share the same map.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<SessionKey, Entry>>>,
    history_limit: usize,
    max_sessions: usize,
}

impl InMemorySessionStore {
    /// Creates a store with the given history bound and session cap.
    pub fn new(history_limit: usize, max_sessions: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            history_limit: history_limit.max(1),
            max_sessions: max_sessions.max(1),
        }
    }

    fn fresh(&self, key: &SessionKey) -> IntakeSession {
        IntakeSession::new(key.clone(), self.history_limit)
    }

    /// Returns the entry for `key`, creating it if needed. Creating at the
    /// cap first evicts the least recently seen entry with no turn in flight.
    fn entry_mut<'a>(
        &self,
        entries: &'a mut HashMap<SessionKey, Entry>,
        key: &SessionKey,
    ) -> &'a mut Entry {
        if !entries.contains_key(key) {
            if entries.len() >= self.max_sessions {
                self.evict_least_recent(entries);
            }
            tracing::debug!(session = %key, "Created intake session");
        }
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(self.fresh(key)));
        entry.seen();
        entry
    }

    fn evict_least_recent(&self, entries: &mut HashMap<SessionKey, Entry>) {
        let victim = entries
            .iter()
            .filter(|(_, entry)| !entry.in_flight())
            .min_by_key(|(_, entry)| entry.last_seen)
            .map(|(key, _)| key.clone());
        match victim {
            Some(victim) => {
                entries.remove(&victim);
                tracing::info!(session = %victim, "Evicted least recently used session");
            }
            None => tracing::warn!(
                cap = self.max_sessions,
                "Session cap reached with every session busy"
            ),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, key: &SessionKey) -> Result<IntakeSession, SessionStoreError> {
        let mut entries = self.entries.write().await;
        Ok(self.entry_mut(&mut entries, key).session.clone())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<IntakeSession>, SessionStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|entry| entry.session.clone()))
    }

    async fn update(
        &self,
        key: &SessionKey,
        update: SessionUpdate,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) => {
                entry.session.apply(update);
                entry.seen();
            }
            None => tracing::debug!(session = %key, "Update for unknown session ignored"),
        }
        Ok(())
    }

    async fn append_history(
        &self,
        key: &SessionKey,
        entry: HistoryEntry,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(stored) => {
                stored.session.push_history(entry);
                stored.seen();
            }
            None => tracing::debug!(session = %key, "History append for unknown session ignored"),
        }
        Ok(())
    }

    async fn reset(&self, key: &SessionKey) -> Result<IntakeSession, SessionStoreError> {
        let mut entries = self.entries.write().await;
        let session = self.fresh(key);
        // The gate survives so a turn holding it stays serialized.
        self.entry_mut(&mut entries, key).session = session.clone();
        tracing::info!(session = %key, "Session reset");
        Ok(session)
    }

    async fn acquire_turn(&self, key: &SessionKey) -> Result<TurnLease, SessionStoreError> {
        let gate = {
            let mut entries = self.entries.write().await;
            Arc::clone(&self.entry_mut(&mut entries, key).gate)
        };
        let guard = gate.lock_owned().await;
        Ok(TurnLease::new(guard))
    }

    async fn evict_idle(&self, idle_for: Duration) -> Result<usize, SessionStoreError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.in_flight() || entry.last_seen.elapsed() < idle_for);
        Ok(before - entries.len())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
