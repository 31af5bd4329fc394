use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use crate::{
    error::Error,
    model::{Account, AppNotification},
    remote::RemoteStore,
    state::SharedAppState,
};

use super::load_store;

#[derive(serde::Deserialize, Debug)]
pub struct MarkReadRequest {
    pub ids: Vec<i64>,
}

#[tracing::instrument(name = "[GET] notifications", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<Vec<AppNotification>>, Error>
where
    B: RemoteStore,
{
    let store = load_store(&app_state, &account).await?;

    Ok(Json(store.notifications().to_vec()))
}

#[tracing::instrument(name = "[POST] notifications read", skip_all)]
pub async fn read<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Json(request): Json<MarkReadRequest>,
) -> Result<Json<Vec<AppNotification>>, Error>
where
    B: RemoteStore,
{
    let mut store = load_store(&app_state, &account).await?;
    store.mark_notifications_as_read(&request.ids).await?;

    Ok(Json(store.notifications().to_vec()))
}
