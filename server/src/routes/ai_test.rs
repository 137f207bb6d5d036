use super::*;
use std::sync::Arc;

use axum::body::to_bytes;
use intake::ai::ResultStatus;
use intake::fallback::ESTIMATED_RANGE;

use crate::state::test_helpers::{self, MockLlm};

fn peer() -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000)))
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn chat_body(message: &str) -> Json<ChatRequest> {
    Json(ChatRequest { message: message.into(), history: vec![] })
}

// =============================================================================
// blank input
// =============================================================================

#[tokio::test]
async fn blank_chat_is_rejected_with_400() {
    let mock = Arc::new(MockLlm::new(vec![]));
    let state = test_helpers::test_app_state_with_llm(mock.clone());

    let response = chat(State(state), peer(), chat_body("   ")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["isFallback"], false);
    assert!(json["data"].is_null());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn blank_refine_is_rejected() {
    let state = test_helpers::test_app_state();
    let response = refine(State(state), peer(), Json(TextRequest { text: "\n".into() })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// live path
// =============================================================================

#[tokio::test]
async fn chat_returns_live_reply() {
    let mock = Arc::new(MockLlm::text(r#"{"message":"Happy to help.","suggestions":["Pricing?"]}"#));
    let state = test_helpers::test_app_state_with_llm(mock);

    let response = chat(State(state), peer(), chat_body("Hi there")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["isFallback"], false);
    assert_eq!(json["data"]["message"], "Happy to help.");
    assert_eq!(json["data"]["suggestions"][0], "Pricing?");
}

#[tokio::test]
async fn audit_failure_is_still_200_with_fallback() {
    let mock = Arc::new(MockLlm::text("not json"));
    let state = test_helpers::test_app_state_with_llm(mock);

    let response = audit(State(state), peer(), Json(TextRequest { text: "Manual invoicing".into() })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["isFallback"], true);
    assert!(json["data"]["recommendedActions"].as_array().is_some_and(|a| !a.is_empty()));
}

#[tokio::test]
async fn ideas_offline() {
    let state = test_helpers::test_app_state();
    let response = ideas(State(state), peer(), Json(IdeasRequest { prompt: "dental clinic".into() })).await;
    let json = body_json(response).await;
    assert_eq!(json["isFallback"], true);
    assert!(json["data"].as_array().is_some_and(|a| !a.is_empty()));
}

// =============================================================================
// rate limiting
// =============================================================================

#[tokio::test]
async fn rate_limited_request_answers_offline_without_calling_model() {
    let mock = Arc::new(MockLlm::new(vec![
        Ok(test_helpers::text_response(r#"{"message":"live"}"#)),
        Ok(test_helpers::text_response(r#"{"message":"live again"}"#)),
    ]));
    let state = test_helpers::test_app_state_limited(mock.clone(), 1);

    let first = body_json(chat(State(state.clone()), peer(), chat_body("hello")).await).await;
    assert_eq!(first["isFallback"], false);

    let response = chat(State(state), peer(), chat_body("How much does it cost?")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["isFallback"], true);
    assert_eq!(second["data"]["projectData"]["estimatedRange"], ESTIMATED_RANGE);
    assert_eq!(mock.calls().len(), 1);
}

#[test]
fn rejected_envelope_shape() {
    let result = NormalizedResult::<String>::rejected();
    assert_eq!(result.status, ResultStatus::Error);
    assert!(!result.is_fallback);
}
