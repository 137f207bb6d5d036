use super::*;
use axum::body::to_bytes;

fn complete_submission() -> ProjectSubmission {
    ProjectSubmission {
        contact_name: "Dana".into(),
        email: "dana@bakery.com".into(),
        primary_goal: "Take orders online".into(),
        features: vec!["Online ordering".into()],
        ..ProjectSubmission::default()
    }
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_submission_is_created() {
    let response = submit(Json(complete_submission())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt: SubmissionReceipt = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!receipt.id.is_nil());
}

#[tokio::test]
async fn missing_email_is_unprocessable() {
    let submission = ProjectSubmission { email: String::new(), ..complete_submission() };
    let response = submit(Json(submission)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "E_FIELD_REQUIRED");
    assert_eq!(json["retryable"], false);
}

#[tokio::test]
async fn malformed_email_is_unprocessable() {
    let submission = ProjectSubmission { email: "dana at bakery.com".into(), ..complete_submission() };
    let json = body_json(submit(Json(submission)).await).await;
    assert_eq!(json["code"], "E_INVALID_EMAIL");
}

#[tokio::test]
async fn empty_scope_is_created() {
    let submission = ProjectSubmission { features: vec![], platforms: vec![], ..complete_submission() };
    let response = submit(Json(submission)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn dotless_domain_is_created() {
    let submission = ProjectSubmission { email: "ops@localhost".into(), ..complete_submission() };
    let response = submit(Json(submission)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
