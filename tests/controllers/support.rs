use axum::http::{Method, StatusCode};
use serde_json::json;
use toque_sync::{
    model::{SupportTicket, TicketStatus},
    remote::RemoteStore,
};

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

#[tokio::test]
async fn should_open_ticket() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::POST,
            "/support/tickets",
            &token,
            &json!({
                "subject": "  Problema com o capítulo 3  ",
                "message": "O exercício de respiração não salva."
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let ticket: SupportTicket = read_json(response).await;
    assert_eq!(ticket.user_id, account.id);
    assert_eq!(ticket.subject, "Problema com o capítulo 3");
    assert_eq!(ticket.status, TicketStatus::Aberto);
}

#[tokio::test]
async fn should_reject_blank_subject_or_message() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    for body in [
        json!({ "subject": "   ", "message": "Preciso de ajuda" }),
        json!({ "subject": "Ajuda", "message": "" }),
        json!({ "subject": "a".repeat(201), "message": "Preciso de ajuda" }),
    ] {
        let response = test_state
            .generate_response(authorized_json_request(
                Method::POST,
                "/support/tickets",
                &token,
                &body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn should_list_own_tickets_newest_first() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;
    let stranger = test_state.generate_account("stranger@localhost").await;

    let first = test_state
        .backend()
        .create_support_ticket(account.id, "Acesso", "Não consigo entrar")
        .await
        .unwrap();
    test_state
        .backend()
        .create_support_ticket(stranger.id, "Outro", "Não deve aparecer")
        .await
        .unwrap();
    let second = test_state
        .backend()
        .create_support_ticket(account.id, "Áudio", "O áudio não toca")
        .await
        .unwrap();

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/support/tickets", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let tickets: Vec<SupportTicket> = read_json(response).await;
    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn should_require_token() {
    let test_state = AppStateTest::new().await;

    let response = test_state
        .generate_response(
            axum::http::Request::builder()
                .method(Method::GET)
                .uri("/support/tickets")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
