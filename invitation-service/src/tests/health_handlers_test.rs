use axum::http::StatusCode;
use chrono::DateTime;
use invitely_shared::test_utils::http_test_utils::{create_test_request, response_to_json};
use tower::ServiceExt;

use super::create_test_app;

#[tokio::test]
async fn test_health() {
    let (app, _store) = create_test_app().await;

    let response = app
        .oneshot(create_test_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["uptimeSeconds"].is_u64());
    assert!(DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_health_is_not_under_api_prefix() {
    let (app, _store) = create_test_app().await;

    let response = app
        .oneshot(create_test_request("GET", "/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
