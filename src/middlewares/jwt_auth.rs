use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{decode_jwt, error::AuthError},
    error::Error,
    remote::AccountStore,
    state::SharedAppState,
};

/// Resolves the bearer token to an [`Account`](crate::model::Account) and
/// stores it in the request extensions.
#[tracing::instrument(name = "[MIDDLEWARE] jwt auth", skip_all)]
pub async fn jwt_auth_middleware<B>(
    State(app_state): State<SharedAppState<B>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, Error>
where
    B: AccountStore,
{
    let auth_header = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| Error::Auth(AuthError::Unauthenticated))?,
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    let mut header = auth_header.split_whitespace();
    let (bearer, token) = match (header.next(), header.next()) {
        (Some(bearer), Some(token)) => (bearer, token),
        _ => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    if !bearer.eq_ignore_ascii_case("bearer") {
        return Err(Error::Auth(AuthError::Unauthenticated));
    }

    let token_data = decode_jwt(token, &app_state.config.jwt)
        .map_err(|_| Error::Auth(AuthError::Unauthenticated))?;

    let account = match app_state
        .backend
        .find_account_by_id(token_data.claims.user_id)
        .await?
    {
        Some(account) => Arc::new(account),
        None => {
            tracing::warn!(user_id = %token_data.claims.user_id, "Token for unknown account");
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}
