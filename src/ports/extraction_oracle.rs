//! Extraction oracle port.
//!
//! Turns (history, current slots, latest message) into updated slots, the
//! list of core slots still missing and a suggested next question. The call
//! is infallible by contract: every failure comes back as a degraded result
//! carrying local fallbacks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionKey, TraceId};
use crate::domain::intake::{HistoryEntry, SlotName, Slots};

/// Why an oracle answered with a fallback instead of a real result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationReason {
    /// No backend configured, or the backend could not be reached.
    Unavailable,
    /// The backend refused on safety grounds.
    ContentFiltered,
    /// Output was not the expected structured shape.
    Malformed,
    /// Output was empty.
    EmptyResponse,
    /// Any other backend error.
    Provider,
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DegradationReason::Unavailable => "unavailable",
            DegradationReason::ContentFiltered => "content_filtered",
            DegradationReason::Malformed => "malformed",
            DegradationReason::EmptyResponse => "empty_response",
            DegradationReason::Provider => "provider",
        };
        f.write_str(s)
    }
}

/// Input to one extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub session_key: SessionKey,
    pub trace_id: TraceId,
    /// History before the latest message.
    pub history: Vec<HistoryEntry>,
    pub slots: Slots,
    /// Normalized latest user message.
    pub message: String,
}

/// Structured extraction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Slots after merging non-null extracted values.
    pub slots: Slots,
    /// Core slots still missing, in reporting order.
    pub missing: Vec<SlotName>,
    /// Free-text plausibility note.
    pub plausibility_note: String,
    /// Question to ask next.
    pub suggested_question: String,
}

/// Tagged extraction outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(ExtractionResult),
    Degraded {
        result: ExtractionResult,
        reason: DegradationReason,
    },
}

impl ExtractionOutcome {
    /// The result, whether extracted or fallback.
    pub fn result(&self) -> &ExtractionResult {
        match self {
            ExtractionOutcome::Extracted(result) => result,
            ExtractionOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ExtractionResult {
        match self {
            ExtractionOutcome::Extracted(result) => result,
            ExtractionOutcome::Degraded { result, .. } => result,
        }
    }

    /// The degradation reason, if any.
    pub fn degradation(&self) -> Option<DegradationReason> {
        match self {
            ExtractionOutcome::Extracted(_) => None,
            ExtractionOutcome::Degraded { reason, .. } => Some(*reason),
        }
    }
}

/// Port for structured slot extraction.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    /// Extracts slots from the latest message. Never fails.
    async fn extract(&self, request: ExtractionRequest) -> ExtractionOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ExtractionResult {
        ExtractionResult {
            slots: Slots::new(),
            missing: vec![SlotName::Department],
            plausibility_note: String::new(),
            suggested_question: "Which department?".to_string(),
        }
    }

    #[test]
    fn extraction_oracle_is_object_safe() {
        fn _accepts_dyn(_oracle: &dyn ExtractionOracle) {}
    }

    #[test]
    fn outcome_exposes_result_and_reason() {
        let ok = ExtractionOutcome::Extracted(result());
        assert_eq!(ok.degradation(), None);
        assert_eq!(ok.result().missing, vec![SlotName::Department]);

        let degraded = ExtractionOutcome::Degraded {
            result: result(),
            reason: DegradationReason::Malformed,
        };
        assert_eq!(degraded.degradation(), Some(DegradationReason::Malformed));
        assert_eq!(degraded.into_result().suggested_question, "Which department?");
    }

    #[test]
    fn degradation_reason_displays_snake_case() {
        assert_eq!(DegradationReason::ContentFiltered.to_string(), "content_filtered");
        assert_eq!(
            serde_json::to_string(&DegradationReason::EmptyResponse).unwrap(),
            "\"empty_response\""
        );
    }
}
