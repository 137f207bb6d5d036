//! Assistant endpoints.
//!
//! Every endpoint answers `200` with a [`NormalizedResult`] except for blank
//! input, which gets `400` with the rejected envelope. A rate-limited
//! request is answered offline instead of reaching the model.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::warn;

use intake::ai::{AuditResult, ChatReply, ChatRequest, Idea, IdeasRequest, NormalizedResult, TextRequest};
use intake::fallback;

use crate::error::ErrorCode;
use crate::state::AppState;

fn rejected<T: Serialize>(operation: &'static str) -> Response {
    warn!(operation, "ai: blank input rejected");
    (StatusCode::BAD_REQUEST, Json(NormalizedResult::<T>::rejected())).into_response()
}

/// Record the request against the limiter; `false` means answer offline.
fn admit(state: &AppState, peer: SocketAddr, operation: &'static str) -> bool {
    match state.rate_limiter.check_and_record(peer.ip()) {
        Ok(()) => true,
        Err(e) => {
            warn!(operation, peer = %peer.ip(), code = e.error_code(), error = %e, "ai: rate limited, answering offline");
            false
        }
    }
}

/// `POST /api/ai/chat`
pub async fn chat(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        return rejected::<ChatReply>("chat");
    }
    let result = if admit(&state, peer, "chat") {
        state.assistant.chat(&body.message, &body.history).await
    } else {
        NormalizedResult::fallback(fallback::chat_reply(&body.message))
    };
    Json(result).into_response()
}

/// `POST /api/ai/audit`
pub async fn audit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<TextRequest>,
) -> Response {
    if body.text.trim().is_empty() {
        return rejected::<AuditResult>("audit");
    }
    let result = if admit(&state, peer, "audit") {
        state.assistant.audit(&body.text).await
    } else {
        NormalizedResult::fallback(fallback::audit_result())
    };
    Json(result).into_response()
}

/// `POST /api/ai/ideas`
pub async fn ideas(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<IdeasRequest>,
) -> Response {
    if body.prompt.trim().is_empty() {
        return rejected::<Vec<Idea>>("ideas");
    }
    let result = if admit(&state, peer, "ideas") {
        state.assistant.generate_ideas(&body.prompt).await
    } else {
        NormalizedResult::fallback(fallback::ideas())
    };
    Json(result).into_response()
}

/// `POST /api/ai/refine`
pub async fn refine(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<TextRequest>,
) -> Response {
    if body.text.trim().is_empty() {
        return rejected::<String>("refine");
    }
    let result = if admit(&state, peer, "refine") {
        state.assistant.refine(&body.text).await
    } else {
        NormalizedResult::fallback(fallback::refined(&body.text))
    };
    Json(result).into_response()
}

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;
