//! ResetSessionHandler - Command handler that discards an intake session.

use std::sync::Arc;

use crate::domain::foundation::SessionKey;
use crate::domain::intake::{IntakeError, IntakeSession};
use crate::ports::SessionStore;

/// Command to discard a session and start over.
#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_key: SessionKey,
}

/// Handler for explicit session resets.
///
/// Waits for any in-flight turn on the key before resetting.
pub struct ResetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl ResetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: ResetSessionCommand) -> Result<IntakeSession, IntakeError> {
        let _lease = self.store.acquire_turn(&cmd.session_key).await?;
        let session = self.store.reset(&cmd.session_key).await?;
        Ok(session)
    }
}
