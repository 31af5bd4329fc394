use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde::{Serialize, de::DeserializeOwned};
use toque_sync::{
    auth::{compute_password_hash, encode_jwt},
    config::{Config, Storage},
    db::memory::MemoryStore,
    model::{Account, SubscriptionStatus},
    remote::AccountStore,
    routes::init_router,
    state::{AppState, SharedAppState},
};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "password";

pub fn test_config() -> Config {
    let mut config = Config::new().expect("Failed to read configuration");
    config.application.host = "127.0.0.1".to_string();
    config.application.port = 0;
    config.application.storage = Storage::Memory;
    config.application.allow_registration = true;
    config
}

pub struct AppStateTest {
    pub app_state: SharedAppState<MemoryStore>,
}

impl AppStateTest {
    pub async fn new() -> Self {
        Self::new_with_config(test_config()).await
    }

    pub async fn new_with_config(config: Config) -> Self {
        let app_state = AppState::memory(config)
            .await
            .expect("Failed to build app state");

        AppStateTest {
            app_state: Arc::new(app_state),
        }
    }

    pub fn backend(&self) -> &MemoryStore {
        &self.app_state.backend
    }

    pub async fn generate_response(&self, request: Request<Body>) -> Response {
        init_router(self.app_state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub async fn generate_account(&self, email: &str) -> Account {
        let password_hash = compute_password_hash(TEST_PASSWORD.into()).unwrap();

        self.backend()
            .create_account(email, &password_hash)
            .await
            .unwrap()
    }

    pub async fn generate_jwt_with_account(&self) -> (Account, String) {
        let account = self.generate_account("test@localhost").await;
        let token = encode_jwt(account.id, &self.app_state.config.jwt).unwrap();

        (account, token)
    }

    pub async fn generate_jwt_with_subscription(
        &self,
        status: SubscriptionStatus,
    ) -> (Account, String) {
        let (account, token) = self.generate_jwt_with_account().await;
        self.backend().set_subscription(account.id, status).await;

        (account, token)
    }
}

pub fn authorized_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authorized_json_request<T: Serialize>(
    method: Method,
    uri: &str,
    token: &str,
    body: &T,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let response_body = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&response_body).unwrap()
}
