//! HTTP routes for intake endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, get_session, health, reset_session, IntakeHandlers};

/// `POST /chat` on its own, so it can be layered apart from the rest.
pub fn chat_routes(handlers: IntakeHandlers) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(handlers)
}

/// Liveness and session inspection endpoints.
pub fn session_routes(handlers: IntakeHandlers) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sessions/:key", get(get_session).delete(reset_session))
        .with_state(handlers)
}
