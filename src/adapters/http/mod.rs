//! HTTP adapters - REST API implementations.
//!
//! `app_router` wraps the intake routes with tracing and CORS. The request
//! timeout covers the session endpoints only; a chat turn always runs to
//! completion and answers with a turn response.

pub mod intake;

use axum::Router;
use http::HeaderValue;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use intake::{chat_routes, session_routes, IntakeHandlers};

/// Builds the CORS layer. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Full application router.
pub fn app_router(
    handlers: IntakeHandlers,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    chat_routes(handlers.clone())
        .merge(session_routes(handlers).layer(TimeoutLayer::new(request_timeout)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}
