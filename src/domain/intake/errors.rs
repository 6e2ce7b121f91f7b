//! Turn-processing errors.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Failure while processing one turn.
///
/// Never reaches the transport: the orchestrator answers every `IntakeError`
/// by resetting the session and sending the apology text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("invalid action transition: {0}")]
    InvalidTransition(#[from] ValidationError),

    #[error("session store failure: {0}")]
    Store(String),

    #[error("turn aborted: {0}")]
    Aborted(String),
}

impl IntakeError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_validation_errors() {
        let err: IntakeError = ValidationError::invalid_format("state_transition", "x").into();
        assert!(matches!(err, IntakeError::InvalidTransition(_)));
        assert!(err.to_string().starts_with("invalid action transition"));
    }

    #[test]
    fn store_error_displays_message() {
        assert_eq!(
            IntakeError::store("lock poisoned").to_string(),
            "session store failure: lock poisoned"
        );
    }
}
