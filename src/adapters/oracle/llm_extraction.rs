//! LLM-backed extraction oracle.
//!
//! Sends the extraction prompt to an `AIProvider` in JSON mode and validates
//! the answer field by field. Any failure, including a panicking provider,
//! degrades to the unchanged slots, a locally computed missing list and a
//! generic clarifying question.

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::json_payload::parse_object;
use super::prompts::{extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::OracleSettings;
use crate::domain::intake::{SlotName, Slots};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, DegradationReason, ExtractionOracle,
    ExtractionOutcome, ExtractionRequest, ExtractionResult, FinishReason, MessageRole,
    RequestMetadata,
};

const DEFAULT_NOTE: &str = "Assessment failed.";
const DEFAULT_QUESTION: &str = "Could you please provide more details?";

/// Note and question used for each degradation reason.
fn fallback_texts(reason: DegradationReason) -> (&'static str, &'static str) {
    match reason {
        DegradationReason::Unavailable => (
            "AI analysis unavailable.",
            "Could you please provide the department, description, and location?",
        ),
        DegradationReason::ContentFiltered => (
            "AI response blocked.",
            "My response was blocked. Could you please rephrase?",
        ),
        DegradationReason::Malformed => (
            "Failed to parse AI analysis.",
            "Sorry, I had trouble understanding that. Could you rephrase?",
        ),
        DegradationReason::EmptyResponse => (
            "AI analysis failed.",
            "Sorry, I couldn't process that. Could you try again?",
        ),
        DegradationReason::Provider => (
            "Error during AI analysis.",
            "Sorry, an error occurred. Could you rephrase?",
        ),
    }
}

/// Maps provider errors onto degradation reasons.
pub(crate) fn degradation_for(err: &AIError) -> DegradationReason {
    match err {
        AIError::ContentFiltered { .. } => DegradationReason::ContentFiltered,
        AIError::Unavailable { .. }
        | AIError::Network(_)
        | AIError::Timeout { .. }
        | AIError::RateLimited { .. } => DegradationReason::Unavailable,
        AIError::Parse(_) => DegradationReason::Malformed,
        _ => DegradationReason::Provider,
    }
}

/// Extraction oracle backed by an LLM provider.
///
/// With no provider configured every call degrades.
pub struct LlmExtractionOracle {
    provider: Option<Arc<dyn AIProvider>>,
    settings: OracleSettings,
}

impl LlmExtractionOracle {
    pub fn new(provider: Option<Arc<dyn AIProvider>>, settings: OracleSettings) -> Self {
        Self { provider, settings }
    }

    fn degraded(slots: &Slots, reason: DegradationReason) -> ExtractionOutcome {
        let (note, question) = fallback_texts(reason);
        ExtractionOutcome::Degraded {
            result: ExtractionResult {
                slots: slots.clone(),
                missing: slots.missing_core(),
                plausibility_note: note.to_string(),
                suggested_question: question.to_string(),
            },
            reason,
        }
    }

    fn build_request(&self, request: &ExtractionRequest) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            request.session_key.clone(),
            request.trace_id,
        ))
        .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
        .with_message(
            MessageRole::User,
            extraction_prompt(&request.history, &request.slots, &request.message),
        )
        .with_temperature(self.settings.extraction_temperature)
        .with_json_output()
    }
}

/// Validates a parsed analysis object against the current slots.
pub(crate) fn interpret(analysis: &Map<String, Value>, current: &Slots) -> ExtractionResult {
    let mut slots = current.clone();
    match analysis.get("extracted_data") {
        Some(Value::Object(extracted)) => {
            let changed = slots.merge_extracted(extracted);
            tracing::debug!(changed = ?changed, "Merged extracted slots");
        }
        other => tracing::warn!(value = ?other, "extracted_data was not an object"),
    }

    let missing = match analysis.get("missing_core_fields").and_then(recognized_names) {
        Some(missing) => missing,
        None => {
            tracing::warn!(
                value = ?analysis.get("missing_core_fields"),
                "missing_core_fields invalid, computing locally"
            );
            slots.missing_core()
        }
    };

    let text = |key: &str, default: &str| {
        analysis
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    };

    ExtractionResult {
        slots,
        missing,
        plausibility_note: text("plausibility_assessment", DEFAULT_NOTE),
        suggested_question: text("next_question_suggestion", DEFAULT_QUESTION),
    }
}

/// Returns the list only if every element names a core slot.
fn recognized_names(value: &Value) -> Option<Vec<SlotName>> {
    let mut names = Vec::new();
    for item in value.as_array()? {
        let slot = SlotName::parse_core(item.as_str()?)?;
        if !names.contains(&slot) {
            names.push(slot);
        }
    }
    Some(names)
}

#[async_trait]
impl ExtractionOracle for LlmExtractionOracle {
    async fn extract(&self, request: ExtractionRequest) -> ExtractionOutcome {
        let Some(provider) = self.provider.as_ref() else {
            tracing::error!(session = %request.session_key, "No AI provider configured for extraction");
            return Self::degraded(&request.slots, DegradationReason::Unavailable);
        };

        let completion = AssertUnwindSafe(provider.complete(self.build_request(&request)))
            .catch_unwind()
            .await;

        let response = match completion {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                let reason = degradation_for(&err);
                tracing::warn!(
                    session = %request.session_key,
                    trace_id = %request.trace_id,
                    error = %err,
                    reason = %reason,
                    "Extraction call failed"
                );
                return Self::degraded(&request.slots, reason);
            }
            Err(_) => {
                tracing::error!(session = %request.session_key, "Extraction provider panicked");
                return Self::degraded(&request.slots, DegradationReason::Provider);
            }
        };

        if response.content.trim().is_empty() {
            let reason = if response.finish_reason == FinishReason::ContentFilter {
                DegradationReason::ContentFiltered
            } else {
                DegradationReason::EmptyResponse
            };
            tracing::warn!(session = %request.session_key, reason = %reason, "Extraction returned no content");
            return Self::degraded(&request.slots, reason);
        }

        match parse_object(&response.content) {
            Ok(analysis) => {
                let result = interpret(&analysis, &request.slots);
                tracing::info!(
                    session = %request.session_key,
                    missing = ?result.missing,
                    note = %result.plausibility_note,
                    "Extraction complete"
                );
                ExtractionOutcome::Extracted(result)
            }
            Err(err) => {
                tracing::warn!(
                    session = %request.session_key,
                    error = %err,
                    raw = %response.content,
                    "Extraction output malformed"
                );
                Self::degraded(&request.slots, DegradationReason::Malformed)
            }
        }
    }
}
