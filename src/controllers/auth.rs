use std::borrow::Cow;

use anyhow::Context;
use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors};

use crate::{
    auth::{compute_password_hash, encode_jwt, error::AuthError, verify_password_hash},
    error::Error,
    model::Account,
    remote::AccountStore,
    state::SharedAppState,
    telemetry::spawn_blocking_with_tracing,
};

#[derive(Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: SecretString,
}

impl Validate for AuthRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.email.validate_email() {
            errors.add(
                "email",
                ValidationError::new("email_email")
                    .with_message(Cow::from("Incorrect email format")),
            );
        }
        if !self.email.validate_length(Some(1), Some(100), None) {
            errors.add(
                "email",
                ValidationError::new("email_length")
                    .with_message(Cow::from("Email length must be between 1 and 100")),
            );
        }

        let password = self.password.expose_secret();
        if !password.validate_length(Some(1), Some(32), None) {
            errors.add(
                "password",
                ValidationError::new("password_length")
                    .with_message(Cow::from("Password length must be between 1 and 32")),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Returns the account and its stored hash, registering it first when the
/// email is unknown and registration is open.
#[tracing::instrument(name = "get or create account", skip(backend, password))]
async fn get_or_create_account<B>(
    backend: &B,
    email: &str,
    password: SecretString,
    allow_registration: bool,
) -> Result<(Account, String), Error>
where
    B: AccountStore,
{
    if let Some(found) = backend.find_account_by_email(email).await? {
        return Ok(found);
    }

    if !allow_registration {
        return Err(Error::Auth(AuthError::AccountNotFound));
    }

    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("compute password hash")
        .map_err(Error::Other)??;

    let account = backend.create_account(email, &password_hash).await?;
    tracing::info!(user_id = %account.id, "Account registered");

    Ok((account, password_hash))
}

#[tracing::instrument(name = "[POST] auth", skip_all)]
pub async fn store<B>(
    State(app_state): State<SharedAppState<B>>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, Error>
where
    B: AccountStore,
{
    request.validate().map_err(Error::Validation)?;

    let (account, hashed_password) = get_or_create_account(
        &app_state.backend,
        &request.email,
        request.password.clone(),
        app_state.config.application.allow_registration,
    )
    .await?;

    spawn_blocking_with_tracing(move || verify_password_hash(hashed_password, request.password))
        .await
        .context("verify password hash")
        .map_err(Error::Other)??;

    let token = encode_jwt(account.id, &app_state.config.jwt)?;

    Ok(Json(AuthResponse { token }))
}
