//! Integration tests for the intake HTTP surface.
//!
//! The full router is assembled the way the binary does it, with the mock
//! provider standing in for the language model, and driven with `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use grievance_desk::adapters::ai::{MockAIProvider, MockResponse};
use grievance_desk::adapters::http::{app_router, IntakeHandlers};
use grievance_desk::adapters::{
    InMemorySessionStore, LlmExtractionOracle, LlmReplyOracle, OracleSettings,
};
use grievance_desk::application::{GetSessionHandler, ProcessTurnHandler, ResetSessionHandler};
use grievance_desk::domain::intake::SEED_GREETING;
use grievance_desk::ports::{AIProvider, FinishReason, SessionStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    mock: MockAIProvider,
}

fn test_app() -> TestApp {
    app_with(MockAIProvider::new(), Duration::from_secs(30))
}

fn app_with(mock: MockAIProvider, request_timeout: Duration) -> TestApp {
    let provider: Arc<dyn AIProvider> = Arc::new(mock.clone());
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());

    let handlers = IntakeHandlers::new(
        Arc::new(ProcessTurnHandler::new(
            store.clone(),
            Arc::new(LlmExtractionOracle::new(
                Some(provider.clone()),
                OracleSettings::default(),
            )),
            Arc::new(LlmReplyOracle::new(Some(provider), OracleSettings::default())),
        )),
        Arc::new(GetSessionHandler::new(store.clone())),
        Arc::new(ResetSessionHandler::new(store)),
    );

    TestApp {
        router: app_router(handlers, &[], request_timeout),
        mock,
    }
}

fn queue(mock: &MockAIProvider, content: impl Into<String>) {
    mock.push(MockResponse::Success {
        content: content.into(),
        finish_reason: FinishReason::Stop,
    });
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn session_request(method: &str, key: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(format!("/sessions/{}", key))
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_reports_running() {
    let app = test_app();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Grievance Chatbot API is running"}));
}

#[tokio::test]
async fn chat_accepts_legacy_session_id() {
    let app = test_app();
    queue(
        &app.mock,
        json!({
            "extracted_data": {"department": "Water", "description": "Leaking pipe"},
            "missing_core_fields": ["address"],
            "plausibility_assessment": "Plausible.",
            "next_question_suggestion": "Where is the leak?"
        })
        .to_string(),
    );
    queue(&app.mock, "Where exactly is the leak?");

    let (status, body) = send(
        &app.router,
        post_chat(json!({"session_id": "legacy-1", "text": "a pipe is leaking"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Where exactly is the leak?");
    assert_eq!(body["action"], "gather_info");
    assert_eq!(body["department"], "Water");
    assert_eq!(body["complaint_ready"], false);
    assert!(body.get("complaint_data").is_none());
}

#[tokio::test]
async fn chat_degrades_when_oracle_output_is_garbage() {
    let app = test_app();
    queue(&app.mock, "not json at all");
    queue(&app.mock, "Could you tell me more?");

    let (status, body) = send(
        &app.router,
        post_chat(json!({"sessionKey": "garbage", "text": "streetlight broken"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "gather_info");
    assert_eq!(body["reply"], "Could you tell me more?");
}

#[tokio::test]
async fn chat_rejects_blank_session_key() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_chat(json!({"sessionKey": "   ", "text": "hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.mock.call_count(), 0);
}

#[tokio::test]
async fn chat_rejects_malformed_body() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"sessionKey": "a"}"#))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_BODY");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = test_app();

    let (status, body) = send(&app.router, session_request("GET", "nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn session_snapshot_reflects_turns_and_delete_resets() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        post_chat(json!({"sessionKey": "s-42", "text": "I need help"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, session_request("GET", "s-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_key"], "s-42");
    assert_eq!(body["conversation_history"].as_array().unwrap().len(), 3);
    assert_eq!(body["conversation_history"][1]["role"], "user");

    let (status, body) = send(&app.router, session_request("DELETE", "s-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "gather_info");
    assert_eq!(
        body["conversation_history"],
        json!([{"role": "bot", "text": SEED_GREETING}])
    );
}

#[tokio::test]
async fn slow_turn_is_not_cut_off_by_request_timeout() {
    let app = app_with(
        MockAIProvider::new().with_delay(Duration::from_millis(150)),
        Duration::from_millis(50),
    );
    queue(&app.mock, "not json");
    queue(&app.mock, "Where is it?");

    let (status, body) = send(
        &app.router,
        post_chat(json!({"sessionKey": "slow", "text": "streetlight broken"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Where is it?");
    assert_eq!(app.mock.call_count(), 2);

    let (status, body) = send(&app.router, session_request("GET", "slow")).await;
    assert_eq!(status, StatusCode::OK);
    let roles: Vec<_> = body["conversation_history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["role"].clone())
        .collect();
    assert_eq!(roles, vec![json!("bot"), json!("user"), json!("bot")]);
}

#[tokio::test]
async fn abandoned_chat_request_still_finishes_the_turn() {
    let app = app_with(
        MockAIProvider::new().with_delay(Duration::from_millis(100)),
        Duration::from_secs(30),
    );
    queue(&app.mock, "not json");
    queue(&app.mock, "Where is it?");

    let request = app
        .router
        .clone()
        .oneshot(post_chat(json!({"sessionKey": "gone", "text": "streetlight broken"})));
    assert!(tokio::time::timeout(Duration::from_millis(20), request)
        .await
        .is_err());

    tokio::time::sleep(Duration::from_millis(500)).await;

    let (status, body) = send(&app.router, session_request("GET", "gone")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["conversation_history"],
        json!([
            {"role": "bot", "text": SEED_GREETING},
            {"role": "user", "text": "streetlight broken"},
            {"role": "bot", "text": "Where is it?"}
        ])
    );
}

#[tokio::test]
async fn oversized_session_key_is_rejected() {
    let app = test_app();
    let key = "k".repeat(129);

    let (status, body) = send(
        &app.router,
        post_chat(json!({"sessionKey": key, "text": "hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.mock.call_count(), 0);
}
