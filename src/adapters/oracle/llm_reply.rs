//! LLM-backed reply oracle.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::llm_extraction::degradation_for;
use super::prompts::{reply_prompt, REPLY_SYSTEM_PROMPT};
use super::OracleSettings;
use crate::domain::intake::{confirmation_summary, ReplyHint};
use crate::ports::{
    AIProvider, CompletionRequest, DegradationReason, FinishReason, MessageRole, ReplyOracle,
    ReplyOutcome, ReplyRequest, RequestMetadata,
};

fn fallback_text(reason: DegradationReason) -> &'static str {
    match reason {
        DegradationReason::Unavailable => {
            "I am currently unable to process requests fully. Please try again later."
        }
        DegradationReason::ContentFiltered => {
            "My response was blocked due to safety settings. Could you please rephrase?"
        }
        DegradationReason::EmptyResponse => {
            "Sorry, I couldn't generate a response. Could you try again?"
        }
        DegradationReason::Malformed | DegradationReason::Provider => {
            "Sorry, an error occurred while generating my response."
        }
    }
}

/// Reply oracle backed by an LLM provider.
///
/// Confirmation requests get the deterministic slot summary appended to the
/// drafted text, so the user always sees exactly what will be filed.
pub struct LlmReplyOracle {
    provider: Option<Arc<dyn AIProvider>>,
    settings: OracleSettings,
}

impl LlmReplyOracle {
    pub fn new(provider: Option<Arc<dyn AIProvider>>, settings: OracleSettings) -> Self {
        Self { provider, settings }
    }

    fn fallback(reason: DegradationReason) -> ReplyOutcome {
        ReplyOutcome::Fallback {
            text: fallback_text(reason).to_string(),
            reason,
        }
    }

    fn build_request(&self, request: &ReplyRequest) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            request.session_key.clone(),
            request.trace_id,
        ))
        .with_system_prompt(REPLY_SYSTEM_PROMPT)
        .with_message(
            MessageRole::User,
            reply_prompt(
                &request.history,
                &request.slots,
                &request.message,
                request.hint,
                &request.suggested_question,
            ),
        )
        .with_temperature(self.settings.reply_temperature)
        .with_max_tokens(self.settings.reply_max_tokens)
    }
}

#[async_trait]
impl ReplyOracle for LlmReplyOracle {
    async fn draft(&self, request: ReplyRequest) -> ReplyOutcome {
        let Some(provider) = self.provider.as_ref() else {
            tracing::error!(session = %request.session_key, "No AI provider configured for replies");
            return Self::fallback(DegradationReason::Unavailable);
        };

        tracing::info!(
            session = %request.session_key,
            trace_id = %request.trace_id,
            hint = ?request.hint,
            "Drafting reply"
        );

        let completion = AssertUnwindSafe(provider.complete(self.build_request(&request)))
            .catch_unwind()
            .await;

        let response = match completion {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::warn!(session = %request.session_key, error = %err, "Reply call failed");
                return Self::fallback(degradation_for(&err));
            }
            Err(_) => {
                tracing::error!(session = %request.session_key, "Reply provider panicked");
                return Self::fallback(DegradationReason::Provider);
            }
        };

        let text = response.content.trim();
        if text.is_empty() {
            let reason = if response.finish_reason == FinishReason::ContentFilter {
                DegradationReason::ContentFiltered
            } else {
                DegradationReason::EmptyResponse
            };
            tracing::warn!(session = %request.session_key, reason = %reason, "Reply was empty");
            return Self::fallback(reason);
        }

        if request.hint == ReplyHint::AskConfirmation {
            return ReplyOutcome::Drafted(format!(
                "{}\n\n{}",
                text,
                confirmation_summary(&request.slots)
            ));
        }
        ReplyOutcome::Drafted(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::{SessionKey, TraceId};
    use crate::domain::intake::{SlotName, Slots};

    fn request(hint: ReplyHint) -> ReplyRequest {
        let mut slots = Slots::new();
        slots.set(SlotName::Department, "Roads");
        ReplyRequest {
            session_key: SessionKey::new("s-1").unwrap(),
            trace_id: TraceId::new(),
            history: Vec::new(),
            message: "pothole".to_string(),
            hint,
            slots,
            suggested_question: "Where is the pothole?".to_string(),
        }
    }

    fn oracle(mock: &MockAIProvider) -> LlmReplyOracle {
        LlmReplyOracle::new(Some(Arc::new(mock.clone())), OracleSettings::default())
    }

    #[tokio::test]
    async fn drafts_trimmed_reply() {
        let mock = MockAIProvider::new().with_response("  Where exactly is the pothole?\n");
        let outcome = oracle(&mock).draft(request(ReplyHint::AskNextQuestion)).await;

        assert_eq!(outcome, ReplyOutcome::Drafted("Where exactly is the pothole?".into()));
        let call = &mock.get_calls()[0];
        assert_eq!(call.temperature, Some(0.7));
        assert_eq!(call.max_tokens, Some(150));
        assert!(call.messages[0].content.contains("'Where is the pothole?'"));
    }

    #[tokio::test]
    async fn confirmation_appends_summary() {
        let mock = MockAIProvider::new().with_response("Thanks! Please confirm.");
        let outcome = oracle(&mock).draft(request(ReplyHint::AskConfirmation)).await;

        let text = outcome.text();
        assert!(text.starts_with("Thanks! Please confirm.\n\nOkay, let's confirm"));
        assert!(text.contains("- Department: Roads"));
    }

    #[tokio::test]
    async fn other_hints_do_not_append_summary() {
        let mock = MockAIProvider::new().with_response("What should change?");
        let outcome = oracle(&mock).draft(request(ReplyHint::AskChangeDetails)).await;
        assert_eq!(outcome.text(), "What should change?");
    }

    #[tokio::test]
    async fn blocked_reply_falls_back() {
        let mock = MockAIProvider::new().with_error(MockError::ContentFiltered {
            reason: "safety".into(),
        });
        let outcome = oracle(&mock).draft(request(ReplyHint::Generic)).await;

        assert!(outcome.is_fallback());
        assert_eq!(
            outcome.text(),
            "My response was blocked due to safety settings. Could you please rephrase?"
        );
    }

    #[tokio::test]
    async fn filtered_empty_reply_counts_as_blocked() {
        let mock = MockAIProvider::new().with_response_full("", FinishReason::ContentFilter);
        let outcome = oracle(&mock).draft(request(ReplyHint::Generic)).await;
        assert_eq!(
            outcome,
            ReplyOutcome::Fallback {
                text: fallback_text(DegradationReason::ContentFiltered).into(),
                reason: DegradationReason::ContentFiltered,
            }
        );
    }

    #[tokio::test]
    async fn empty_reply_falls_back() {
        let mock = MockAIProvider::new().with_response("   ");
        let outcome = oracle(&mock).draft(request(ReplyHint::AskConfirmation)).await;
        assert_eq!(
            outcome.text(),
            "Sorry, I couldn't generate a response. Could you try again?"
        );
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let mock = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let outcome = oracle(&mock).draft(request(ReplyHint::Generic)).await;
        assert_eq!(
            outcome.text(),
            "Sorry, an error occurred while generating my response."
        );
    }

    #[tokio::test]
    async fn panicking_provider_falls_back() {
        let mock = MockAIProvider::new().with_panic("kaboom");
        let outcome = oracle(&mock).draft(request(ReplyHint::Generic)).await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn missing_provider_falls_back() {
        let oracle = LlmReplyOracle::new(None, OracleSettings::default());
        let outcome = oracle.draft(request(ReplyHint::Generic)).await;
        assert_eq!(
            outcome.text(),
            "I am currently unable to process requests fully. Please try again later."
        );
    }
}
