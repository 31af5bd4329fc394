use axum::http::{Method, StatusCode};
use serde_json::json;
use toque_sync::model::{Achievement, AppNotification, NotificationType};

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

#[tokio::test]
async fn should_be_empty_for_new_account() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/achievements", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let achievements: Vec<Achievement> = read_json(response).await;
    assert!(achievements.is_empty());
}

#[tokio::test]
async fn should_award_one_achievement_per_completed_chapter() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;

    for _ in 0..2 {
        let response = test_state
            .generate_response(authorized_json_request(
                Method::PUT,
                "/chapters/1/progress",
                &token,
                &json!({ "completed": true }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/achievements", &token))
        .await;
    let achievements: Vec<Achievement> = read_json(response).await;
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].chapter_id, 1);
    assert_eq!(achievements[0].user_id, account.id);

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/notifications", &token))
        .await;
    let notifications: Vec<AppNotification> = read_json(response).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationType::Achievement);
    assert_eq!(notifications[0].metadata.medal_icon.as_deref(), Some("🌅"));
}
