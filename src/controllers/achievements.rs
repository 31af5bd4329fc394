use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use crate::{
    error::Error,
    model::{Account, Achievement},
    remote::RemoteStore,
    state::SharedAppState,
};

use super::load_store;

#[tracing::instrument(name = "[GET] achievements", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<Vec<Achievement>>, Error>
where
    B: RemoteStore,
{
    let store = load_store(&app_state, &account).await?;

    Ok(Json(store.achievements().to_vec()))
}
