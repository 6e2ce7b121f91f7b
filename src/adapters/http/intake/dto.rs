//! Data Transfer Objects for intake HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::application::TurnResponse;
use crate::domain::foundation::Timestamp;
use crate::domain::intake::{
    FinalizedComplaint, HistoryEntry, IntakeSession, Intent, NextAction, SessionPhase, Slots,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

fn default_locale() -> String {
    "en".to_string()
}

/// Request body for one dialogue turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "sessionKey", alias = "session_id", alias = "session_key")]
    pub session_key: String,
    pub text: String,
    #[serde(default = "default_locale", alias = "language")]
    pub locale: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for one dialogue turn. Absent optionals are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub action: NextAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_data: Option<FinalizedComplaint>,
    pub complaint_ready: bool,
}

impl From<TurnResponse> for ChatResponse {
    fn from(turn: TurnResponse) -> Self {
        Self {
            reply: turn.reply,
            suggested_actions: (!turn.suggested_actions.is_empty())
                .then_some(turn.suggested_actions),
            detected_intent: turn.detected_intent,
            corrected_text: turn.corrected_text,
            department: turn.department,
            action: turn.action,
            complaint_data: turn.complaint,
            complaint_ready: turn.complaint_ready,
        }
    }
}

/// Snapshot of an intake session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_key: String,
    pub phase: SessionPhase,
    pub slots: Slots,
    pub conversation_history: Vec<HistoryEntry>,
    pub last_action: NextAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_complaint: Option<FinalizedComplaint>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<IntakeSession> for SessionResponse {
    fn from(session: IntakeSession) -> Self {
        Self {
            session_key: session.key().to_string(),
            phase: session.phase(),
            slots: session.slots().clone(),
            conversation_history: session.history().to_vec(),
            last_action: session.last_action(),
            prepared_complaint: session.prepared_complaint().cloned(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            message: "Grievance Chatbot API is running".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            code: "INVALID_BODY".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionKey;
    use serde_json::json;

    #[test]
    fn chat_request_accepts_both_key_spellings() {
        let camel: ChatRequest =
            serde_json::from_value(json!({"sessionKey": "a", "text": "hi"})).unwrap();
        assert_eq!(camel.session_key, "a");
        assert_eq!(camel.locale, "en");

        let legacy: ChatRequest = serde_json::from_value(
            json!({"session_id": "b", "text": "hi", "language": "fr"}),
        )
        .unwrap();
        assert_eq!(legacy.session_key, "b");
        assert_eq!(legacy.locale, "fr");
    }

    #[test]
    fn chat_request_requires_text() {
        let result: Result<ChatRequest, _> = serde_json::from_value(json!({"sessionKey": "a"}));
        assert!(result.is_err());
    }

    #[test]
    fn chat_response_omits_absent_fields() {
        let value = serde_json::to_value(ChatResponse::from(TurnResponse::recovered())).unwrap();
        assert_eq!(
            value,
            json!({
                "reply": "I encountered an unexpected issue and had to reset our conversation. Please start again.",
                "action": "reset",
                "complaint_ready": false
            })
        );
    }

    #[test]
    fn chat_response_uses_snake_case_wire_names() {
        let mut turn = TurnResponse::recovered();
        turn.detected_intent = Some(Intent::ConfirmationYes);
        turn.action = NextAction::TriggerRegistration;
        turn.suggested_actions = vec!["Yes, submit".into()];

        let value = serde_json::to_value(ChatResponse::from(turn)).unwrap();
        assert_eq!(value["detected_intent"], "confirmation_yes");
        assert_eq!(value["action"], "trigger_registration");
        assert_eq!(value["suggested_actions"], json!(["Yes, submit"]));
    }

    #[test]
    fn session_response_snapshots_session() {
        let session = IntakeSession::new(SessionKey::new("s-1").unwrap(), 20);
        let value = serde_json::to_value(SessionResponse::from(session)).unwrap();

        assert_eq!(value["session_key"], "s-1");
        assert_eq!(value["last_action"], "gather_info");
        assert_eq!(value["conversation_history"][0]["role"], "bot");
        assert_eq!(value["slots"]["specific_details"], "");
        assert!(value.get("prepared_complaint").is_none());
    }

    #[test]
    fn error_response_not_found_creates_correctly() {
        let error = ErrorResponse::not_found("Session", "abc-123");
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Session not found: abc-123");
    }

    #[test]
    fn error_response_serializes_code_and_message_only() {
        let value = serde_json::to_value(ErrorResponse::bad_request("nope")).unwrap();
        assert_eq!(value, json!({"code": "BAD_REQUEST", "message": "nope"}));
    }
}
