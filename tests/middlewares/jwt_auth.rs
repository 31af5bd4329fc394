use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use toque_sync::auth::encode_jwt;
use uuid::Uuid;

use crate::{AppStateTest, authorized_request};

#[tokio::test]
async fn should_throw_error_when_request_does_not_contain_header_authorization() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder().uri("/me").body(Body::empty()).unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_auth_header_is_invalid() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/progress")
        .header(axum::http::header::AUTHORIZATION, "random-string")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_auth_header_does_not_contain_bearer() {
    let test_state = AppStateTest::new().await;

    let request = Request::builder()
        .uri("/chapters")
        .header(
            axum::http::header::AUTHORIZATION,
            "not-bearer random-string",
        )
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_jwt_token_is_invalid() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/me", "random-string"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_throw_error_when_account_is_missing() {
    let test_state = AppStateTest::new().await;

    let token = encode_jwt(Uuid::new_v4(), &test_state.app_state.config.jwt).unwrap();

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/me", &token))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_be_ok_when_account_exists() {
    let test_state = AppStateTest::new().await;

    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/achievements", &token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}
