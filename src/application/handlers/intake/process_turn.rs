//! ProcessTurn command handler.
//!
//! Runs one dialogue turn for a session: normalize, classify, short-circuit
//! or extract, decide, draft the reply, persist. Turns on the same key are
//! serialized through the store's turn gate; oracle calls run while only that
//! gate is held.
//!
//! A turn never fails outward. Any error or panic resets the session and
//! answers with the apology text.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;

use crate::domain::foundation::{SessionKey, TraceId};
use crate::domain::intake::{
    classify_intent, normalize, DialoguePolicy, FinalizedComplaint, HistoryEntry, Intent,
    IntakeError, NextAction, ReplyPlan, SessionUpdate, ShortCircuit, TurnContext, APOLOGY_TEXT,
};
use crate::ports::{
    ExtractionOracle, ExtractionRequest, ReplyOracle, ReplyRequest, SessionStore,
};

/// Command to process one user message.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_key: SessionKey,
    /// Raw user text.
    pub text: String,
    /// Client locale tag. Carried for logging only.
    pub locale: String,
}

impl ProcessTurnCommand {
    pub fn new(session_key: SessionKey, text: impl Into<String>) -> Self {
        Self {
            session_key,
            text: text.into(),
            locale: "en".to_string(),
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Outbound envelope for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResponse {
    pub reply: String,
    /// Quick-actions to offer; empty when none apply.
    pub suggested_actions: Vec<String>,
    pub detected_intent: Option<Intent>,
    /// Normalized text, present only when a misspelling was corrected.
    pub corrected_text: Option<String>,
    pub department: Option<String>,
    pub action: NextAction,
    pub complaint: Option<FinalizedComplaint>,
    pub complaint_ready: bool,
}

impl TurnResponse {
    fn short_circuit(short: ShortCircuit, intent: Intent) -> Self {
        Self {
            reply: short.reply().to_string(),
            suggested_actions: short.quick_actions(),
            detected_intent: Some(intent),
            corrected_text: None,
            department: None,
            action: short.action(),
            complaint: None,
            complaint_ready: false,
        }
    }

    /// Response sent after a failed turn reset the session.
    pub fn recovered() -> Self {
        Self {
            reply: APOLOGY_TEXT.to_string(),
            suggested_actions: Vec::new(),
            detected_intent: None,
            corrected_text: None,
            department: None,
            action: NextAction::Reset,
            complaint: None,
            complaint_ready: false,
        }
    }
}

/// The dialogue orchestrator.
pub struct ProcessTurnHandler {
    store: Arc<dyn SessionStore>,
    extraction: Arc<dyn ExtractionOracle>,
    reply: Arc<dyn ReplyOracle>,
    policy: DialoguePolicy,
}

impl ProcessTurnHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        extraction: Arc<dyn ExtractionOracle>,
        reply: Arc<dyn ReplyOracle>,
    ) -> Self {
        Self {
            store,
            extraction,
            reply,
            policy: DialoguePolicy::new(),
        }
    }

    /// Processes one turn. Always yields a well-formed response.
    pub async fn handle(&self, cmd: ProcessTurnCommand) -> TurnResponse {
        let trace_id = TraceId::new();
        let span = tracing::info_span!(
            "turn",
            session = %cmd.session_key,
            trace_id = %trace_id,
            locale = %cmd.locale
        );

        let outcome = AssertUnwindSafe(self.run_turn(&cmd, trace_id).instrument(span))
            .catch_unwind()
            .await;

        let cause = match outcome {
            Ok(Ok(response)) => return response,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => format!("panic: {}", panic_message(&*payload)),
        };

        tracing::error!(session = %cmd.session_key, cause = %cause, "Turn failed, resetting session");
        let reset = AssertUnwindSafe(self.reset_after_failure(&cmd.session_key))
            .catch_unwind()
            .await;
        if reset.is_err() {
            tracing::error!(session = %cmd.session_key, "Session reset panicked after failed turn");
        }
        TurnResponse::recovered()
    }

    async fn run_turn(
        &self,
        cmd: &ProcessTurnCommand,
        trace_id: TraceId,
    ) -> Result<TurnResponse, IntakeError> {
        let key = &cmd.session_key;
        let _lease = self.store.acquire_turn(key).await?;

        let session = self.store.get_or_create(key).await?;
        let history = session.history().to_vec();
        let last_action = session.last_action();

        let normalized = normalize(&cmd.text);
        let intent = classify_intent(&normalized.text);
        self.store
            .append_history(key, HistoryEntry::user(cmd.text.clone()))
            .await?;
        tracing::debug!(intent = %intent, last_action = %last_action, "Classified message");

        if let Some(short) = ShortCircuit::from_intent(intent) {
            return self.short_circuit(key, short, intent).await;
        }

        let outcome = self
            .extraction
            .extract(ExtractionRequest {
                session_key: key.clone(),
                trace_id,
                history: history.clone(),
                slots: session.slots().clone(),
                message: normalized.text.clone(),
            })
            .await;
        if let Some(reason) = outcome.degradation() {
            tracing::warn!(reason = %reason, "Extraction degraded to fallback");
        }
        let extracted = outcome.into_result();
        self.store
            .update(key, SessionUpdate::new().with_slots(extracted.slots.clone()))
            .await?;

        let decision = self.policy.decide(TurnContext {
            last_action,
            intent,
            slots: &extracted.slots,
            missing: &extracted.missing,
            suggested_question: &extracted.suggested_question,
        })?;

        let reply = match decision.reply {
            ReplyPlan::Fixed(text) => text.to_string(),
            ReplyPlan::Draft(hint) => {
                let outcome = self
                    .reply
                    .draft(ReplyRequest {
                        session_key: key.clone(),
                        trace_id,
                        history,
                        message: normalized.text.clone(),
                        hint,
                        slots: extracted.slots.clone(),
                        suggested_question: extracted.suggested_question.clone(),
                    })
                    .await;
                if outcome.is_fallback() {
                    tracing::warn!(hint = ?hint, "Reply degraded to fallback");
                }
                outcome.into_text()
            }
        };

        let mut update = SessionUpdate::new().with_last_action(decision.action);
        if let Some(complaint) = &decision.complaint {
            update = update.with_prepared_complaint(complaint.clone());
        }
        self.store.update(key, update).await?;
        self.store
            .append_history(key, HistoryEntry::bot(reply.clone()))
            .await?;

        tracing::info!(
            action = %decision.action,
            missing = ?extracted.missing,
            complaint_ready = decision.complaint_ready(),
            "Turn complete"
        );

        Ok(TurnResponse {
            reply,
            suggested_actions: decision.quick_actions.clone(),
            detected_intent: Some(intent),
            corrected_text: normalized.corrected_text().map(str::to_string),
            department: extracted.slots.department.clone(),
            action: decision.action,
            complaint_ready: decision.complaint_ready(),
            complaint: decision.complaint,
        })
    }

    async fn short_circuit(
        &self,
        key: &SessionKey,
        short: ShortCircuit,
        intent: Intent,
    ) -> Result<TurnResponse, IntakeError> {
        if short.resets_session() {
            self.store.reset(key).await?;
        } else {
            self.store
                .append_history(key, HistoryEntry::bot(short.reply()))
                .await?;
            self.store
                .update(key, SessionUpdate::new().with_last_action(short.action()))
                .await?;
        }
        tracing::info!(intent = %intent, action = %short.action(), "Short-circuit turn");
        Ok(TurnResponse::short_circuit(short, intent))
    }

    async fn reset_after_failure(&self, key: &SessionKey) {
        let _lease = match self.store.acquire_turn(key).await {
            Ok(lease) => Some(lease),
            Err(e) => {
                tracing::error!(session = %key, error = %e, "Could not acquire turn for reset");
                None
            }
        };
        if let Err(e) = self.store.reset(key).await {
            tracing::error!(session = %key, error = %e, "Failed to reset session after error");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
