use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use toque_sync::db::memory::Table;

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

#[tokio::test]
async fn should_return_empty_snapshot_for_new_account() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/progress", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_json(response).await;
    assert_eq!(body["profile"]["id"], json!(account.id));
    assert_eq!(body["progress_by_chapter"], json!({}));
    assert_eq!(body["achievements"], json!([]));
    assert_eq!(body["unread_notifications"], json!(0));
    assert_eq!(body["completed_chapters"], json!(0));
    assert_eq!(body["has_access"], json!(false));
}

#[tokio::test]
async fn should_include_saved_progress() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/progress",
            &token,
            &json!({ "progress": 40 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/progress", &token))
        .await;
    let body: Value = read_json(response).await;

    assert_eq!(body["progress_by_chapter"]["1"]["progress"], json!(40));
    assert_eq!(body["progress_by_chapter"]["1"]["completed"], json!(false));
}

#[tokio::test]
async fn should_throw_error_when_store_is_unavailable() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;
    test_state.backend().fail_table(Table::Notifications).await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/progress", &token))
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
