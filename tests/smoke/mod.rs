use reqwest::StatusCode;
use serde_json::json;
use toque_sync::{controllers::auth::AuthResponse, startup::Application};

use crate::{TEST_PASSWORD, test_config};

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

async fn spawn_app() -> TestApp {
    let application = Application::build(test_config())
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    tokio::spawn(application.run_until_stopped());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        api_client: client,
    }
}

#[tokio::test]
async fn should_sign_in_and_read_chapters_over_http() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(format!("{}/", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let auth: AuthResponse = app
        .api_client
        .post(format!("{}/auth", app.address))
        .json(&json!({ "email": "smoke@localhost", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = app
        .api_client
        .get(format!("{}/chapters", app.address))
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chapters: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(chapters.len(), 15);
}
