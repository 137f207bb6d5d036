//! Project intake submission.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use intake::form::ProjectSubmission;

use crate::error::ErrorBody;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
}

/// `POST /api/intake`: validate a finished project form.
///
/// Applies the same step rules as the form. Accepted submissions are logged
/// and acknowledged with a fresh id; nothing is stored.
pub async fn submit(Json(submission): Json<ProjectSubmission>) -> Response {
    if let Err(e) = submission.validate() {
        warn!(field = %e.field, code = e.error_code(), "intake: submission rejected");
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::from_error(&e))).into_response();
    }

    let id = Uuid::new_v4();
    info!(
        %id,
        features = submission.features.len(),
        platforms = submission.platforms.len(),
        has_company = !submission.company_name.trim().is_empty(),
        has_notes = !submission.notes.trim().is_empty(),
        "intake: submission received"
    );
    (StatusCode::CREATED, Json(SubmissionReceipt { id })).into_response()
}

#[cfg(test)]
#[path = "submissions_test.rs"]
mod tests;
