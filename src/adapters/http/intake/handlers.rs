//! HTTP handlers for intake endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    GetSessionError, GetSessionHandler, GetSessionQuery, ProcessTurnCommand, ProcessTurnHandler,
    ResetSessionCommand, ResetSessionHandler, TurnResponse,
};
use crate::domain::foundation::SessionKey;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, SessionResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IntakeHandlers {
    turn_handler: Arc<ProcessTurnHandler>,
    get_handler: Arc<GetSessionHandler>,
    reset_handler: Arc<ResetSessionHandler>,
}

impl IntakeHandlers {
    pub fn new(
        turn_handler: Arc<ProcessTurnHandler>,
        get_handler: Arc<GetSessionHandler>,
        reset_handler: Arc<ResetSessionHandler>,
    ) -> Self {
        Self {
            turn_handler,
            get_handler,
            reset_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Liveness
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

/// POST /chat - Process one dialogue turn
///
/// Conversation failures come back as a normal reply; only a malformed
/// request is rejected. The turn runs on its own task, so a client that
/// disconnects mid-turn does not leave the session half-written.
pub async fn chat(
    State(handlers): State<IntakeHandlers>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(ErrorResponse::invalid_body(rejection.body_text())),
            )
                .into_response()
        }
    };

    let session_key = match parse_key(&req.session_key) {
        Ok(key) => key,
        Err(response) => return response,
    };

    tracing::info!(session = %session_key, "Received chat message");
    let cmd = ProcessTurnCommand::new(session_key.clone(), req.text).with_locale(req.locale);
    let turn_handler = handlers.turn_handler.clone();
    let turn = match tokio::spawn(async move { turn_handler.handle(cmd).await }).await {
        Ok(turn) => turn,
        Err(e) => {
            tracing::error!(session = %session_key, error = %e, "Turn task failed");
            TurnResponse::recovered()
        }
    };
    tracing::info!(
        session = %session_key,
        action = %turn.action,
        ready = turn.complaint_ready,
        "Sending response"
    );

    (StatusCode::OK, Json(ChatResponse::from(turn))).into_response()
}

/// GET /sessions/:key - Inspect a session
pub async fn get_session(
    State(handlers): State<IntakeHandlers>,
    Path(key): Path<String>,
) -> Response {
    let session_key = match parse_key(&key) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match handlers
        .get_handler
        .handle(GetSessionQuery { session_key })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(session))).into_response(),
        Err(e) => handle_get_error(e),
    }
}

/// DELETE /sessions/:key - Discard a session and start over
pub async fn reset_session(
    State(handlers): State<IntakeHandlers>,
    Path(key): Path<String>,
) -> Response {
    let session_key = match parse_key(&key) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match handlers
        .reset_handler
        .handle(ResetSessionCommand { session_key })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(session))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Session reset failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_key(raw: &str) -> Result<SessionKey, Response> {
    SessionKey::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Invalid session key: {}", e))),
        )
            .into_response()
    })
}

fn handle_get_error(error: GetSessionError) -> Response {
    match error {
        GetSessionError::NotFound(key) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", key.as_str())),
        )
            .into_response(),
        GetSessionError::Store(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let error = GetSessionError::NotFound(SessionKey::new("s-1").unwrap());
        assert_eq!(handle_get_error(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_error_maps_to_500() {
        let error = GetSessionError::Store("down".into());
        assert_eq!(
            handle_get_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn blank_key_is_rejected() {
        let response = parse_key("   ").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
