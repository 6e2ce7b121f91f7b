//! GetSessionHandler - Query handler for inspecting an intake session.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::SessionKey;
use crate::domain::intake::IntakeSession;
use crate::ports::{SessionStore, SessionStoreError};

/// Query to inspect a session by key.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_key: SessionKey,
}

/// Errors from session queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GetSessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionKey),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<SessionStoreError> for GetSessionError {
    fn from(err: SessionStoreError) -> Self {
        GetSessionError::Store(err.to_string())
    }
}

/// Handler for inspecting a session without creating it.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<IntakeSession, GetSessionError> {
        self.store
            .get(&query.session_key)
            .await?
            .ok_or(GetSessionError::NotFound(query.session_key))
    }
}
