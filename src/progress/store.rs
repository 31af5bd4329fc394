//! Per-session cache of a user's course state.
//!
//! The remote store is the source of truth. `load` replaces the whole cache in
//! one step, saves never patch it (callers reload afterwards), and marking
//! notifications read is the single optimistic patch.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    exercise::ExerciseData,
    model::{
        Achievement, AppNotification, Chapter, ChapterId, ChapterOverview, ChapterProgress,
        ChapterProgressUpdate, ExerciseResponse, UserProfile,
    },
    remote::{ChapterProgressUpsert, ExerciseResponseUpsert, IdentityProvider, RemoteStore},
};

use super::error::{LastError, ProgressError};

/// The catalog's entry point. Always unlocked.
pub const ENTRY_CHAPTER_ID: ChapterId = 1;

/// Everything `load` reads, as one unit.
#[derive(serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub profile: Option<UserProfile>,
    pub progress_by_chapter: HashMap<ChapterId, ChapterProgress>,
    pub exercise_responses: HashMap<ChapterId, HashMap<String, ExerciseData>>,
    pub achievements: Vec<Achievement>,
    pub notifications: Vec<AppNotification>,
}

impl Snapshot {
    fn from_rows(
        profile: Option<UserProfile>,
        progress: Vec<ChapterProgress>,
        responses: Vec<ExerciseResponse>,
        achievements: Vec<Achievement>,
        notifications: Vec<AppNotification>,
    ) -> Self {
        let progress_by_chapter = progress.into_iter().map(|p| (p.chapter_id, p)).collect();

        let mut exercise_responses: HashMap<ChapterId, HashMap<String, ExerciseData>> =
            HashMap::new();
        for response in responses {
            exercise_responses
                .entry(response.chapter_id)
                .or_default()
                .insert(response.exercise_id, response.response);
        }

        Snapshot {
            profile,
            progress_by_chapter,
            exercise_responses,
            achievements,
            notifications,
        }
    }
}

/// Paid access is granted by a premium or trial subscription.
pub fn has_profile_access(profile: Option<&UserProfile>) -> bool {
    profile
        .map(|p| p.subscription_status.has_access())
        .unwrap_or(false)
}

pub struct ProgressStore<R, I> {
    remote: R,
    identity: I,
    cache: Snapshot,
    loading: bool,
    last_error: Option<LastError>,
}

impl<R, I> ProgressStore<R, I>
where
    R: RemoteStore,
    I: IdentityProvider,
{
    pub fn new(remote: R, identity: I) -> Self {
        Self {
            remote,
            identity,
            cache: Snapshot::default(),
            loading: false,
            last_error: None,
        }
    }

    #[tracing::instrument(name = "load progress", skip_all)]
    pub async fn load(&mut self) -> Result<(), ProgressError> {
        self.loading = true;
        let result = self.fetch_snapshot().await;
        self.loading = false;

        match result {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(error) => Err(self.record(error)),
        }
    }

    /// Issues the five reads concurrently without touching the cache.
    /// A missing identity yields an empty snapshot.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, ProgressError> {
        let Some(user_id) = self.identity.current_user().await else {
            tracing::debug!("No signed-in user, using an empty snapshot");
            return Ok(Snapshot::default());
        };

        let (profile, progress, responses, achievements, notifications) = futures::try_join!(
            self.remote.fetch_profile(user_id),
            self.remote.fetch_chapter_progress(user_id),
            self.remote.fetch_exercise_responses(user_id),
            self.remote.fetch_achievements(user_id),
            self.remote.fetch_notifications(user_id),
        )
        .map_err(ProgressError::RemoteRead)?;

        if profile.is_none() {
            tracing::info!(user_id = %user_id, "Profile row not provisioned yet");
        }

        Ok(Snapshot::from_rows(
            profile,
            progress,
            responses,
            achievements,
            notifications,
        ))
    }

    /// Replaces the whole cache. When loads overlap, the last one applied wins.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.cache = snapshot;
        self.last_error = None;
    }

    #[tracing::instrument(name = "save chapter progress", skip(self))]
    pub async fn save_chapter_progress(
        &mut self,
        chapter_id: ChapterId,
        update: ChapterProgressUpdate,
    ) -> Result<(), ProgressError> {
        let user_id = self.require_user().await?;

        if let Some(progress) = update.progress {
            if progress > 100 {
                return Err(self.record(ProgressError::InvalidProgress(progress)));
            }
        }

        let now = Utc::now();
        let completing = update.completed == Some(true);
        let upsert = ChapterProgressUpsert {
            chapter_id,
            completed: update.completed,
            progress: if completing {
                Some(100)
            } else {
                update.progress
            },
            last_accessed_at: now,
            completed_at: completing.then_some(now),
        };

        match self.remote.upsert_chapter_progress(user_id, &upsert).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.record(ProgressError::RemoteWrite(error))),
        }
    }

    #[tracing::instrument(
        name = "save exercise response",
        skip(self, response),
        fields(exercise_type = %response.kind())
    )]
    pub async fn save_exercise_response(
        &mut self,
        chapter_id: ChapterId,
        exercise_id: &str,
        response: &ExerciseData,
    ) -> Result<(), ProgressError> {
        let user_id = self.require_user().await?;

        let response_data = match response.to_payload() {
            Ok(value) => value,
            Err(error) => {
                return Err(self.record(ProgressError::InvalidResponse(error)));
            }
        };

        let upsert = ExerciseResponseUpsert {
            chapter_id,
            exercise_id: exercise_id.to_string(),
            exercise_type: response.kind(),
            response_data,
            completed_at: Utc::now(),
        };

        match self.remote.upsert_exercise_response(user_id, &upsert).await {
            Ok(()) => Ok(()),
            Err(error) => Err(self.record(ProgressError::RemoteWrite(error))),
        }
    }

    /// Flips `is_read` remotely for the caller's own notifications, then
    /// patches the cached copies without a reload.
    #[tracing::instrument(name = "mark notifications as read", skip_all, fields(count = ids.len()))]
    pub async fn mark_notifications_as_read(&mut self, ids: &[i64]) -> Result<(), ProgressError> {
        let user_id = self.require_user().await?;

        if ids.is_empty() {
            return Ok(());
        }

        match self.remote.mark_notifications_read(user_id, ids).await {
            Ok(updated) => {
                tracing::debug!(updated, "Notifications marked as read");
                for notification in self
                    .cache
                    .notifications
                    .iter_mut()
                    .filter(|n| ids.contains(&n.id))
                {
                    notification.is_read = true;
                }
                Ok(())
            }
            Err(error) => Err(self.record(ProgressError::RemoteWrite(error))),
        }
    }

    /// Plain field update; the cache takes the row the store returns.
    #[tracing::instrument(name = "update profile name", skip_all)]
    pub async fn update_profile_name(&mut self, name: &str) -> Result<UserProfile, ProgressError> {
        let user_id = self.require_user().await?;

        match self.remote.update_profile_name(user_id, name).await {
            Ok(profile) => {
                self.cache.profile = Some(profile.clone());
                Ok(profile)
            }
            Err(error) => Err(self.record(ProgressError::RemoteWrite(error))),
        }
    }

    /// Ends the identity session and drops everything cached for it.
    pub async fn sign_out(&mut self) {
        self.identity.sign_out().await;
        self.cache = Snapshot::default();
        self.last_error = None;
    }

    pub async fn current_user(&self) -> Option<Uuid> {
        self.identity.current_user().await
    }

    pub fn is_exercise_completed(&self, chapter_id: ChapterId, exercise_id: &str) -> bool {
        self.exercise_response(chapter_id, exercise_id).is_some()
    }

    pub fn exercise_response(&self, chapter_id: ChapterId, exercise_id: &str) -> Option<&ExerciseData> {
        self.cache
            .exercise_responses
            .get(&chapter_id)
            .and_then(|responses| responses.get(exercise_id))
    }

    pub fn has_access(&self) -> bool {
        has_profile_access(self.cache.profile.as_ref())
    }

    /// Chapter `n` opens when chapter `n - 1` is completed. Premium chapters
    /// additionally need paid access, checked first. The entry chapter is
    /// always open.
    pub fn is_chapter_unlocked(&self, chapter_id: ChapterId, is_premium: bool) -> bool {
        if chapter_id == ENTRY_CHAPTER_ID {
            return true;
        }

        if is_premium && !self.has_access() {
            return false;
        }

        chapter_id
            .checked_sub(1)
            .is_some_and(|previous| self.is_chapter_completed(previous))
    }

    pub fn is_chapter_completed(&self, chapter_id: ChapterId) -> bool {
        self.cache
            .progress_by_chapter
            .get(&chapter_id)
            .map(|p| p.completed)
            .unwrap_or(false)
    }

    pub fn chapter_overview(&self, chapter: &Chapter) -> ChapterOverview {
        let progress = self.cache.progress_by_chapter.get(&chapter.id);

        ChapterOverview {
            id: chapter.id,
            title: chapter.title.clone(),
            subtitle: chapter.subtitle.clone(),
            description: chapter.description.clone(),
            icon: chapter.icon.clone(),
            medal_icon: chapter.medal_icon.clone(),
            estimated_time: chapter.estimated_time.clone(),
            is_premium: chapter.is_premium,
            is_locked: !self.is_chapter_unlocked(chapter.id, chapter.is_premium),
            is_completed: progress.map(|p| p.completed).unwrap_or(false),
            progress: progress.map(|p| p.progress).unwrap_or(0),
        }
    }

    /// Share of the chapter's exercises with a saved response, rounded down.
    pub fn exercise_progress(&self, chapter: &Chapter) -> u8 {
        if chapter.exercises.is_empty() {
            return 100;
        }

        let completed = self.completed_exercises(chapter);
        (completed * 100 / chapter.exercises.len()) as u8
    }

    pub fn can_complete_chapter(&self, chapter: &Chapter) -> bool {
        self.completed_exercises(chapter) == chapter.exercises.len()
    }

    fn completed_exercises(&self, chapter: &Chapter) -> usize {
        chapter
            .exercises
            .iter()
            .filter(|e| self.is_exercise_completed(chapter.id, &e.id))
            .count()
    }

    pub fn unread_notifications(&self) -> usize {
        self.cache.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn completed_chapters(&self) -> usize {
        self.cache.achievements.len()
    }

    pub fn has_achievement(&self, chapter_id: ChapterId) -> bool {
        self.cache
            .achievements
            .iter()
            .any(|a| a.chapter_id == chapter_id)
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.cache.profile.as_ref()
    }

    pub fn chapter_progress(&self, chapter_id: ChapterId) -> Option<&ChapterProgress> {
        self.cache.progress_by_chapter.get(&chapter_id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.cache.achievements
    }

    pub fn notifications(&self) -> &[AppNotification] {
        &self.cache.notifications
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.cache
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    async fn require_user(&mut self) -> Result<Uuid, ProgressError> {
        match self.identity.current_user().await {
            Some(user_id) => Ok(user_id),
            None => Err(self.record(ProgressError::Unauthenticated)),
        }
    }

    fn record(&mut self, error: ProgressError) -> ProgressError {
        match &error {
            ProgressError::RemoteRead(cause) | ProgressError::RemoteWrite(cause) => {
                tracing::error!(err.msg = %error, err.details = ?cause, "Remote store error");
            }
            other => tracing::warn!(err.msg = %other, "Progress store error"),
        }

        self.last_error = Some(LastError::from(&error));
        error
    }
}
