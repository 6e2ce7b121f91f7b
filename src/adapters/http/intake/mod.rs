//! HTTP adapter for intake endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, SessionResponse};
pub use handlers::IntakeHandlers;
pub use routes::{chat_routes, session_routes};
