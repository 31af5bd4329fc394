//! Boundary between the progress store and whatever persists the data.
//!
//! [`RemoteStore`] is the row-level query surface the store reads from and
//! writes to. [`AccountStore`] is the credential side used by sign-in.
//! [`IdentityProvider`] answers "who is signed in" for one session.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::error::DatabaseError,
    exercise::ExerciseKind,
    model::{
        Account, Achievement, AppNotification, Chapter, ChapterId, ChapterProgress,
        ExerciseResponse, SupportTicket, UserProfile,
    },
};

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> impl Future<Output = Option<Uuid>> + Send;

    fn sign_out(&mut self) -> impl Future<Output = ()> + Send;
}

/// Upsert keyed by (user, chapter). `None` fields keep the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterProgressUpsert {
    pub chapter_id: ChapterId,
    pub completed: Option<bool>,
    pub progress: Option<u8>,
    pub last_accessed_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Upsert keyed by (user, chapter, exercise). Saved responses are always complete.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseResponseUpsert {
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub exercise_type: ExerciseKind,
    pub response_data: serde_json::Value,
    pub completed_at: DateTime<Utc>,
}

pub trait RemoteStore: Clone + Send + Sync + 'static {
    /// `Ok(None)` when the profile row has not been provisioned.
    fn fetch_profile(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<UserProfile>, DatabaseError>> + Send;

    fn fetch_chapter_progress(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<ChapterProgress>, DatabaseError>> + Send;

    fn fetch_exercise_responses(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<ExerciseResponse>, DatabaseError>> + Send;

    fn fetch_achievements(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Achievement>, DatabaseError>> + Send;

    /// Newest first.
    fn fetch_notifications(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<AppNotification>, DatabaseError>> + Send;

    /// Catalog order.
    fn fetch_chapters(&self) -> impl Future<Output = Result<Vec<Chapter>, DatabaseError>> + Send;

    fn upsert_chapter_progress(
        &self,
        user_id: Uuid,
        upsert: &ChapterProgressUpsert,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;

    fn upsert_exercise_response(
        &self,
        user_id: Uuid,
        upsert: &ExerciseResponseUpsert,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;

    /// Only rows owned by `user_id` are touched. Returns the number of rows updated.
    fn mark_notifications_read(
        &self,
        user_id: Uuid,
        ids: &[i64],
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;

    fn update_profile_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> impl Future<Output = Result<UserProfile, DatabaseError>> + Send;

    /// Newest first.
    fn fetch_support_tickets(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<SupportTicket>, DatabaseError>> + Send;

    /// Opens a ticket in the `aberto` state.
    fn create_support_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> impl Future<Output = Result<SupportTicket, DatabaseError>> + Send;
}

pub trait AccountStore: Clone + Send + Sync + 'static {
    /// Returns the account with its password hash.
    fn find_account_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<(Account, String)>, DatabaseError>> + Send;

    fn find_account_by_id(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<Account>, DatabaseError>> + Send;

    /// Creates the credential row and provisions a free profile for it.
    fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> impl Future<Output = Result<Account, DatabaseError>> + Send;
}

/// Name given to a freshly provisioned profile.
pub fn default_profile_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
