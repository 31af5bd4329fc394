use crate::{
    auth::Session,
    error::{ChapterError, Error},
    model::{Account, Chapter, ChapterId},
    progress::ProgressStore,
    remote::RemoteStore,
    state::AppState,
};

pub mod achievements;
pub mod auth;
pub mod chapters;
pub mod home;
pub mod me;
pub mod notifications;
pub mod progress;
pub mod support;

pub type RequestStore<B> = ProgressStore<B, Session>;

/// One loaded store per request, scoped to the authenticated account.
pub(crate) async fn load_store<B>(
    app_state: &AppState<B>,
    account: &Account,
) -> Result<RequestStore<B>, Error>
where
    B: RemoteStore,
{
    let mut store = ProgressStore::new(
        app_state.backend.clone(),
        Session::authenticated(account.id),
    );
    store.load().await?;

    Ok(store)
}

pub(crate) async fn find_chapter<B>(
    app_state: &AppState<B>,
    chapter_id: ChapterId,
) -> Result<Chapter, Error>
where
    B: RemoteStore,
{
    app_state
        .backend
        .fetch_chapters()
        .await?
        .into_iter()
        .find(|c| c.id == chapter_id)
        .ok_or(Error::Chapter(ChapterError::NotFound(chapter_id)))
}

/// Loads the store and rejects chapters the caller cannot open yet.
pub(crate) async fn unlocked_chapter<B>(
    app_state: &AppState<B>,
    account: &Account,
    chapter_id: ChapterId,
) -> Result<(RequestStore<B>, Chapter), Error>
where
    B: RemoteStore,
{
    let chapter = find_chapter(app_state, chapter_id).await?;
    let store = load_store(app_state, account).await?;

    if !store.is_chapter_unlocked(chapter.id, chapter.is_premium) {
        return Err(Error::Chapter(ChapterError::Locked(chapter.id)));
    }

    Ok((store, chapter))
}
