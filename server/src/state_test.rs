use super::*;
use test_helpers::MockLlm;

#[test]
fn offline_state_has_no_model() {
    let state = AppState::offline();
    assert_eq!(state.mode, AssistantMode::Offline);
    assert!(state.model.is_none());
}

#[test]
fn llm_state_is_live() {
    let state = AppState::with_llm(Arc::new(MockLlm::new(vec![])), AiLimits::default());
    assert_eq!(state.mode, AssistantMode::Live);
}

#[test]
fn mode_serializes_lowercase() {
    assert_eq!(serde_json::to_value(AssistantMode::Live).unwrap(), "live");
    assert_eq!(serde_json::to_value(AssistantMode::Offline).unwrap(), "offline");
}

#[tokio::test]
async fn offline_assistant_answers_with_fallback() {
    let state = test_helpers::test_app_state();
    let result = state.assistant.audit("We retype invoices by hand").await;
    assert!(result.is_fallback);
    assert!(result.is_well_formed());
}

#[tokio::test]
async fn mock_records_calls_and_errors_when_exhausted() {
    let mock = MockLlm::text("hello");
    let first = mock.chat(16, "sys", &[crate::llm::types::Message::user("hi")]).await.unwrap();
    assert_eq!(first.text(), "hello");
    assert!(mock.chat(16, "sys", &[]).await.is_err());
    assert_eq!(mock.calls().len(), 2);
    assert_eq!(mock.calls()[0].0, "sys");
}
