use super::*;
use serde_json::json;

// =============================================================================
// build_request
// =============================================================================

#[test]
fn request_maps_roles_and_system_instruction() {
    let messages = vec![Message::user("hi"), Message::assistant("hello"), Message::user("price?")];
    let value = serde_json::to_value(build_request(256, "Answer in JSON.", &messages)).unwrap();

    assert_eq!(value["contents"][0]["role"], "user");
    assert_eq!(value["contents"][1]["role"], "model");
    assert_eq!(value["contents"][2]["parts"][0]["text"], "price?");
    assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Answer in JSON.");
    assert_eq!(value["generationConfig"]["maxOutputTokens"], 256);
}

#[test]
fn blank_system_prompt_is_omitted() {
    let messages = vec![Message::user("hi")];
    let value = serde_json::to_value(build_request(64, " ", &messages)).unwrap();
    assert!(value.get("systemInstruction").is_none());
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_text_response() {
    let body = json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "{\"message\":\"Hi\"}" }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 7, "totalTokenCount": 19 },
        "modelVersion": "gemini-2.5-flash-001"
    })
    .to_string();
    let resp = parse_response("gemini-2.5-flash", &body).unwrap();
    assert_eq!(resp.text(), "{\"message\":\"Hi\"}");
    assert_eq!(resp.model, "gemini-2.5-flash-001");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 12);
    assert_eq!(resp.output_tokens, 7);
}

#[test]
fn parse_skips_thought_parts() {
    let body = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "thinking...", "thought": true }, { "text": "Answer" }] },
            "finishReason": "STOP"
        }]
    })
    .to_string();
    let resp = parse_response("m", &body).unwrap();
    assert_eq!(resp.text(), "Answer");
    assert_eq!(resp.model, "m");
}

#[test]
fn parse_safety_block_has_no_text() {
    let body = json!({ "candidates": [{ "finishReason": "SAFETY" }] }).to_string();
    let resp = parse_response("m", &body).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.stop_reason, "refusal");
}

#[test]
fn parse_max_tokens() {
    let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "{" }] }, "finishReason": "MAX_TOKENS" }] })
        .to_string();
    assert_eq!(parse_response("m", &body).unwrap().stop_reason, "max_tokens");
}

#[test]
fn parse_without_candidates_errors() {
    let body = json!({ "promptFeedback": { "blockReason": "OTHER" } }).to_string();
    assert!(matches!(parse_response("m", &body), Err(LlmError::ApiParse(_))));
}

#[test]
fn parse_invalid_json_errors() {
    assert!(matches!(parse_response("m", "<html>"), Err(LlmError::ApiParse(_))));
}
