use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use toque_sync::{
    controllers::chapters::{ChapterDetail, ExerciseState},
    model::{ChapterId, ChapterOverview, SubscriptionStatus},
    remote::{ChapterProgressUpsert, RemoteStore},
};
use uuid::Uuid;

use crate::{AppStateTest, authorized_json_request, authorized_request, read_json};

fn reflection_answers() -> Value {
    json!({
        "type": "reflection",
        "data": {
            "responses": {
                "0": "Quero me conhecer melhor",
                "1": "A forma como lido com o estresse",
                "2": "Presença no dia a dia"
            }
        }
    })
}

fn practice_items() -> Value {
    json!({ "type": "practice", "data": { "checkedItems": { "0": true, "1": true } } })
}

async fn complete_directly(test_state: &AppStateTest, user_id: Uuid, chapters: &[ChapterId]) {
    for chapter_id in chapters {
        test_state
            .backend()
            .upsert_chapter_progress(
                user_id,
                &ChapterProgressUpsert {
                    chapter_id: *chapter_id,
                    completed: Some(true),
                    progress: Some(100),
                    last_accessed_at: Utc::now(),
                    completed_at: Some(Utc::now()),
                },
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn should_list_chapters_with_lock_state() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let chapters: Vec<ChapterOverview> = read_json(response).await;
    assert_eq!(chapters.len(), 15);
    assert_eq!(chapters[0].id, 1);
    assert!(!chapters[0].is_locked);
    assert!(chapters[1].is_locked);
    assert!(chapters[3].is_premium);
    assert!(chapters.iter().all(|c| c.progress == 0 && !c.is_completed));
}

#[tokio::test]
async fn should_show_chapter_with_exercises() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/1", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail: ChapterDetail = read_json(response).await;
    assert_eq!(detail.overview.id, 1);
    assert_eq!(detail.exercises.len(), 2);
    assert_eq!(detail.exercise_progress, 0);
    assert!(!detail.can_complete);
    assert!(detail.exercises.iter().all(|e| !e.is_completed));
}

#[tokio::test]
async fn should_throw_not_found_for_unknown_chapter() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/99", &token))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_throw_forbidden_for_locked_chapter() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/2", &token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/2/progress",
            &token,
            &json!({ "progress": 10 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_keep_premium_chapter_locked_without_access() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;
    complete_directly(&test_state, account.id, &[1, 2, 3]).await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/4", &token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    test_state
        .backend()
        .set_subscription(account.id, SubscriptionStatus::Premium)
        .await;

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/4", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_reject_progress_over_one_hundred() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/progress",
            &token,
            &json!({ "progress": 101 }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_force_full_progress_when_completed_is_sent() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/progress",
            &token,
            &json!({ "completed": true, "progress": 30 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let overview: ChapterOverview = read_json(response).await;
    assert!(overview.is_completed);
    assert_eq!(overview.progress, 100);
}

#[tokio::test]
async fn should_lower_completed_count_when_chapter_is_reopened() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    for completed in [true, false] {
        let response = test_state
            .generate_response(authorized_json_request(
                Method::PUT,
                "/chapters/1/progress",
                &token,
                &json!({ "completed": completed }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/me", &token))
        .await;
    let body: Value = read_json(response).await;
    assert_eq!(body["profile"]["total_completed_chapters"], json!(0));

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/2", &token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_validate_exercise_responses() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let short = json!({
        "type": "reflection",
        "data": { "responses": { "0": "curta", "1": "também curta", "2": "ok" } }
    });
    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/exercises/ex1-1",
            &token,
            &short,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/exercises/ex1-1",
            &token,
            &practice_items(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/exercises/ex1-9",
            &token,
            &practice_items(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_save_exercise_response() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_json_request(
            Method::PUT,
            "/chapters/1/exercises/ex1-1",
            &token,
            &reflection_answers(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let state: ExerciseState = read_json(response).await;
    assert_eq!(state.exercise.id, "ex1-1");
    assert!(state.is_completed);
    assert!(state.response.is_some());

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/1", &token))
        .await;
    let detail: ChapterDetail = read_json(response).await;
    assert_eq!(detail.exercise_progress, 50);
    assert!(!detail.can_complete);
}

#[tokio::test]
async fn should_complete_chapter_once_exercises_are_done() {
    let test_state = AppStateTest::new().await;
    let (_, token) = test_state.generate_jwt_with_account().await;

    let response = test_state
        .generate_response(authorized_request(
            Method::POST,
            "/chapters/1/complete",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    for (exercise_id, body) in [("ex1-1", reflection_answers()), ("ex1-2", practice_items())] {
        let response = test_state
            .generate_response(authorized_json_request(
                Method::PUT,
                &format!("/chapters/1/exercises/{}", exercise_id),
                &token,
                &body,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = test_state
        .generate_response(authorized_request(
            Method::POST,
            "/chapters/1/complete",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = read_json(response).await;
    assert_eq!(outcome["newly_completed"], json!(true));
    assert_eq!(outcome["medal_icon"], json!("🌅"));

    let response = test_state
        .generate_response(authorized_request(
            Method::POST,
            "/chapters/1/complete",
            &token,
        ))
        .await;
    let outcome: Value = read_json(response).await;
    assert_eq!(outcome["newly_completed"], json!(false));

    let response = test_state
        .generate_response(authorized_request(Method::GET, "/chapters/2", &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_complete_chapter_without_exercises() {
    let test_state = AppStateTest::new().await;
    let (account, token) = test_state.generate_jwt_with_account().await;
    complete_directly(&test_state, account.id, &[1, 2]).await;

    let response = test_state
        .generate_response(authorized_request(
            Method::POST,
            "/chapters/3/complete",
            &token,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome: Value = read_json(response).await;
    assert_eq!(outcome["chapter_id"], json!(3));
    assert_eq!(outcome["newly_completed"], json!(true));

    let profile = test_state
        .backend()
        .fetch_profile(account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.total_completed_chapters, 3);
}
