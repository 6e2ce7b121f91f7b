//! Session store port.
//!
//! Owns every intake session for the lifetime of the process. Callers get
//! snapshots back and mutate through the store, so no component keeps a
//! session reference across turns.
//!
//! # Design
//!
//! - **Lazy creation**: `get_or_create` seeds unseen keys with the greeting
//! - **Merge updates**: `update` and `append_history` are no-ops for absent keys
//! - **Turn gate**: `acquire_turn` serializes turns per key without blocking
//!   other keys

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::SessionKey;
use crate::domain::intake::{HistoryEntry, IntakeError, IntakeSession, SessionUpdate};

/// Errors raised by a session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("session state corrupted: {0}")]
    Corrupted(String),
}

impl From<SessionStoreError> for IntakeError {
    fn from(err: SessionStoreError) -> Self {
        IntakeError::store(err.to_string())
    }
}

/// Exclusive right to run one turn on a session; released on drop.
pub struct TurnLease {
    _guard: Box<dyn Send + Sync>,
}

impl TurnLease {
    /// Wraps any guard whose drop releases the gate.
    pub fn new(guard: impl Send + Sync + 'static) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

impl std::fmt::Debug for TurnLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TurnLease")
    }
}

/// Store of intake sessions keyed by client session key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session, creating a seeded one on miss.
    async fn get_or_create(&self, key: &SessionKey) -> Result<IntakeSession, SessionStoreError>;

    /// Returns the session if it exists, without creating it.
    async fn get(&self, key: &SessionKey) -> Result<Option<IntakeSession>, SessionStoreError>;

    /// Merges a partial update. No-op if the key is absent.
    async fn update(&self, key: &SessionKey, update: SessionUpdate)
        -> Result<(), SessionStoreError>;

    /// Appends to the bounded history. No-op if the key is absent.
    async fn append_history(
        &self,
        key: &SessionKey,
        entry: HistoryEntry,
    ) -> Result<(), SessionStoreError>;

    /// Discards the session and returns a freshly seeded one.
    async fn reset(&self, key: &SessionKey) -> Result<IntakeSession, SessionStoreError>;

    /// Waits until no other turn holds the key, then holds it.
    async fn acquire_turn(&self, key: &SessionKey) -> Result<TurnLease, SessionStoreError>;

    /// Drops sessions idle for at least `idle_for`; returns how many went.
    ///
    /// Sessions with a turn in flight are kept.
    async fn evict_idle(&self, idle_for: Duration) -> Result<usize, SessionStoreError>;

    /// Number of live sessions.
    async fn len(&self) -> usize;

    /// True when no session is live.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
