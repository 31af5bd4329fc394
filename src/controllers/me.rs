use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::{
    error::Error,
    model::{Account, UserProfile},
    remote::RemoteStore,
    state::SharedAppState,
};

use super::load_store;

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct MeResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub profile: Option<UserProfile>,
    pub has_access: bool,
}

#[derive(serde::Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name length must be between 1 and 100"))]
    pub name: String,
}

#[tracing::instrument(name = "[GET] me", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<MeResponse>, Error>
where
    B: RemoteStore,
{
    let store = load_store(&app_state, &account).await?;

    Ok(Json(MeResponse {
        id: account.id,
        email: account.email.clone(),
        profile: store.profile().cloned(),
        has_access: store.has_access(),
    }))
}

#[tracing::instrument(name = "[PATCH] me", skip_all)]
pub async fn update<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, Error>
where
    B: RemoteStore,
{
    let request = UpdateProfileRequest {
        name: request.name.trim().to_string(),
    };
    request.validate().map_err(Error::Validation)?;

    let mut store = load_store(&app_state, &account).await?;
    let profile = store.update_profile_name(&request.name).await?;

    Ok(Json(profile))
}
