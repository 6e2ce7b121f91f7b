//! Reply oracle port.
//!
//! Drafts the natural-language bot reply for a resolved hint. Infallible by
//! contract: a failed draft comes back as fixed fallback text.

use async_trait::async_trait;

use super::extraction_oracle::DegradationReason;
use crate::domain::foundation::{SessionKey, TraceId};
use crate::domain::intake::{HistoryEntry, ReplyHint, Slots};

/// Input to one reply call.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub session_key: SessionKey,
    pub trace_id: TraceId,
    /// History before the latest message.
    pub history: Vec<HistoryEntry>,
    /// Normalized latest user message.
    pub message: String,
    pub hint: ReplyHint,
    pub slots: Slots,
    /// Question suggested by the extraction step.
    pub suggested_question: String,
}

/// Tagged reply outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Drafted(String),
    Fallback {
        text: String,
        reason: DegradationReason,
    },
}

impl ReplyOutcome {
    pub fn text(&self) -> &str {
        match self {
            ReplyOutcome::Drafted(text) => text,
            ReplyOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ReplyOutcome::Drafted(text) => text,
            ReplyOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ReplyOutcome::Fallback { .. })
    }
}

/// Port for reply drafting.
#[async_trait]
pub trait ReplyOracle: Send + Sync {
    /// Drafts the reply. Never fails.
    async fn draft(&self, request: ReplyRequest) -> ReplyOutcome;
}
