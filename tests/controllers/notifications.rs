use axum::http::{Method, StatusCode};
use serde_json::json;
use toque_sync::model::{AppNotification, NotificationType};
use uuid::Uuid;

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

#[tokio::test]
async fn should_list_newest_first() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;
    let first = test_state
        .backend()
        .push_notification(account.id, NotificationType::System, "Bem-vindo", "Olá")
        .await;
    let second = test_state
        .backend()
        .push_notification(account.id, NotificationType::Reminder, "Lembrete", "Pratique")
        .await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/notifications", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let notifications: Vec<AppNotification> = read_json(response).await;
    let ids: Vec<i64> = notifications.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(notifications.iter().all(|n| !n.is_read));
}

#[tokio::test]
async fn should_mark_only_requested_notifications() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;
    let first = test_state
        .backend()
        .push_notification(account.id, NotificationType::System, "Um", "primeira")
        .await;
    let second = test_state
        .backend()
        .push_notification(account.id, NotificationType::System, "Dois", "segunda")
        .await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::POST,
            "/notifications/read",
            &token,
            &json!({ "ids": [first] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let notifications: Vec<AppNotification> = read_json(response).await;
    for notification in notifications {
        assert_eq!(notification.is_read, notification.id == first);
        assert!(notification.id == first || notification.id == second);
    }
}

#[tokio::test]
async fn should_not_mark_notifications_of_another_user() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;
    let other_user = Uuid::new_v4();
    let foreign = test_state
        .backend()
        .push_notification(other_user, NotificationType::System, "Outro", "alheia")
        .await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::POST,
            "/notifications/read",
            &token,
            &json!({ "ids": [foreign] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let notifications: Vec<AppNotification> = read_json(response).await;
    assert!(notifications.is_empty());

    let untouched = toque_sync::remote::RemoteStore::fetch_notifications(
        test_state.backend(),
        other_user,
    )
    .await
    .unwrap();
    assert!(!untouched[0].is_read);
}
