use crate::{
    model::{Chapter, ChapterId, ChapterProgressUpdate},
    remote::{IdentityProvider, RemoteStore},
};

use super::{error::ProgressError, store::ProgressStore};

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub chapter_id: ChapterId,
    pub title: String,
    pub medal_icon: String,
    /// `false` when the cache already had the chapter as completed.
    pub newly_completed: bool,
}

/// Marks `chapter` completed and reloads. Whether it is "new" is decided from
/// the cache before the write, so two sessions racing may both report it.
#[tracing::instrument(name = "complete chapter", skip_all, fields(chapter_id = chapter.id))]
pub async fn complete_chapter<R, I>(
    store: &mut ProgressStore<R, I>,
    chapter: &Chapter,
) -> Result<CompletionOutcome, ProgressError>
where
    R: RemoteStore,
    I: IdentityProvider,
{
    let was_completed = store.is_chapter_completed(chapter.id);

    store
        .save_chapter_progress(chapter.id, ChapterProgressUpdate::completed())
        .await?;
    store.load().await?;

    if !was_completed {
        tracing::info!(chapter_id = chapter.id, "Chapter completed");
    }

    Ok(CompletionOutcome {
        chapter_id: chapter.id,
        title: chapter.title.clone(),
        medal_icon: chapter.medal_icon.clone(),
        newly_completed: !was_completed,
    })
}
