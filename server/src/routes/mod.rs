//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the assistant and intake endpoints under `/api`, a
//! health check and a status probe. The public marketing site is served as
//! static files at `/` through the fallback service.

pub mod ai;
pub mod submissions;

use std::path::PathBuf;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ErrorBody;
use crate::state::{AppState, AssistantMode};

/// JSON API routes.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(intake::ai::CHAT_PATH, post(ai::chat))
        .route(intake::ai::AUDIT_PATH, post(ai::audit))
        .route(intake::ai::IDEAS_PATH, post(ai::ideas))
        .route(intake::ai::REFINE_PATH, post(ai::refine))
        .route("/api/intake", post(submissions::submit))
        .route("/api/status", get(status))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Resolve the path to the marketing website directory.
fn website_dir() -> PathBuf {
    std::env::var("WEBSITE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../website"))
}

/// Full application: API routes, static site fallback, tracing and the
/// panic boundary.
pub fn app(state: AppState) -> Router {
    let website_service = ServeDir::new(website_dir()).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(website_service)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(_payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    let body = ErrorBody {
        code: "E_INTERNAL",
        message: "Something went wrong. Please reload the page.".into(),
        retryable: true,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub mode: AssistantMode,
    pub model: Option<String>,
}

/// `GET /api/status`: which assistant strategy is answering.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse { mode: state.mode, model: state.model.clone() })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
