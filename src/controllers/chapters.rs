use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::{
    error::{ChapterError, Error},
    exercise::{Exercise, ExerciseData},
    model::{Account, Chapter, ChapterId, ChapterOverview, ChapterProgressUpdate},
    progress::{CompletionOutcome, complete_chapter},
    remote::RemoteStore,
    state::SharedAppState,
};

use super::{RequestStore, load_store, unlocked_chapter};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseState {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub is_completed: bool,
    pub response: Option<ExerciseData>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ChapterDetail {
    #[serde(flatten)]
    pub overview: ChapterOverview,
    pub content: serde_json::Value,
    pub exercise_progress: u8,
    pub can_complete: bool,
    pub exercises: Vec<ExerciseState>,
}

fn exercise_state<B>(store: &RequestStore<B>, chapter_id: ChapterId, exercise: &Exercise) -> ExerciseState
where
    B: RemoteStore,
{
    let response = store.exercise_response(chapter_id, &exercise.id).cloned();

    ExerciseState {
        exercise: exercise.clone(),
        is_completed: response.is_some(),
        response,
    }
}

fn chapter_detail<B>(store: &RequestStore<B>, chapter: Chapter) -> ChapterDetail
where
    B: RemoteStore,
{
    ChapterDetail {
        overview: store.chapter_overview(&chapter),
        exercise_progress: store.exercise_progress(&chapter),
        can_complete: store.can_complete_chapter(&chapter),
        exercises: chapter
            .exercises
            .iter()
            .map(|e| exercise_state(store, chapter.id, e))
            .collect(),
        content: chapter.content,
    }
}

#[tracing::instrument(name = "[GET] chapters", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<Vec<ChapterOverview>>, Error>
where
    B: RemoteStore,
{
    let chapters = app_state.backend.fetch_chapters().await?;
    let store = load_store(&app_state, &account).await?;

    Ok(Json(
        chapters.iter().map(|c| store.chapter_overview(c)).collect(),
    ))
}

#[tracing::instrument(name = "[GET] chapter", skip_all, fields(chapter_id))]
pub async fn show<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Path(chapter_id): Path<ChapterId>,
) -> Result<Json<ChapterDetail>, Error>
where
    B: RemoteStore,
{
    tracing::Span::current().record("chapter_id", chapter_id);
    let (store, chapter) = unlocked_chapter(&app_state, &account, chapter_id).await?;

    Ok(Json(chapter_detail(&store, chapter)))
}

#[tracing::instrument(name = "[PUT] chapter progress", skip_all, fields(chapter_id))]
pub async fn update_progress<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Path(chapter_id): Path<ChapterId>,
    Json(update): Json<ChapterProgressUpdate>,
) -> Result<Json<ChapterOverview>, Error>
where
    B: RemoteStore,
{
    tracing::Span::current().record("chapter_id", chapter_id);
    update.validate().map_err(Error::Validation)?;

    let (mut store, chapter) = unlocked_chapter(&app_state, &account, chapter_id).await?;
    store.save_chapter_progress(chapter.id, update).await?;
    store.load().await?;

    Ok(Json(store.chapter_overview(&chapter)))
}

#[tracing::instrument(name = "[POST] chapter complete", skip_all, fields(chapter_id))]
pub async fn complete<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Path(chapter_id): Path<ChapterId>,
) -> Result<Json<CompletionOutcome>, Error>
where
    B: RemoteStore,
{
    tracing::Span::current().record("chapter_id", chapter_id);
    let (mut store, chapter) = unlocked_chapter(&app_state, &account, chapter_id).await?;

    if !store.can_complete_chapter(&chapter) {
        let pending = chapter
            .exercises
            .iter()
            .filter(|e| !store.is_exercise_completed(chapter.id, &e.id))
            .count();

        return Err(Error::Chapter(ChapterError::ExercisesPending {
            chapter_id: chapter.id,
            pending,
        }));
    }

    let outcome = complete_chapter(&mut store, &chapter).await?;

    Ok(Json(outcome))
}

#[tracing::instrument(name = "[PUT] chapter exercise", skip_all, fields(chapter_id, exercise_id))]
pub async fn save_exercise<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Path((chapter_id, exercise_id)): Path<(ChapterId, String)>,
    Json(response): Json<ExerciseData>,
) -> Result<Json<ExerciseState>, Error>
where
    B: RemoteStore,
{
    let span = tracing::Span::current();
    span.record("chapter_id", chapter_id);
    span.record("exercise_id", exercise_id.as_str());

    let (mut store, chapter) = unlocked_chapter(&app_state, &account, chapter_id).await?;
    let exercise = chapter
        .exercise(&exercise_id)
        .ok_or_else(|| ChapterError::ExerciseNotFound(exercise_id.clone()))?;

    exercise
        .validate_response(&response)
        .map_err(ChapterError::from)?;

    store
        .save_exercise_response(chapter.id, &exercise.id, &response)
        .await?;
    store.load().await?;

    Ok(Json(exercise_state(&store, chapter.id, exercise)))
}
