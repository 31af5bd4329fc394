use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use crate::{
    error::Error, model::Account, progress::Snapshot, remote::RemoteStore, state::SharedAppState,
};

use super::load_store;

#[derive(serde::Serialize, Debug)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub has_access: bool,
    pub unread_notifications: usize,
    pub completed_chapters: usize,
}

#[tracing::instrument(name = "[GET] progress", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<ProgressResponse>, Error>
where
    B: RemoteStore,
{
    let store = load_store(&app_state, &account).await?;

    Ok(Json(ProgressResponse {
        snapshot: store.snapshot().clone(),
        has_access: store.has_access(),
        unread_notifications: store.unread_notifications(),
        completed_chapters: store.completed_chapters(),
    }))
}
