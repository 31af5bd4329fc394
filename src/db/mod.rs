use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    model::{
        Account, Achievement, AppNotification, Chapter, ChapterProgress, ExerciseResponse,
        SupportTicket, UserProfile,
    },
    remote::{AccountStore, ChapterProgressUpsert, ExerciseResponseUpsert, RemoteStore},
};

use self::error::DatabaseError;

pub mod account;
pub mod achievement;
pub mod chapter;
pub mod chapter_progress;
pub mod error;
pub mod exercise_response;
pub mod memory;
pub mod notification;
pub mod profile;
pub mod support_ticket;

pub type PostgresTransaction = Transaction<'static, Postgres>;

/// PostgreSQL-backed store. Completion side effects (achievements,
/// notifications, the profile counter) run in the `user_progress` trigger.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RemoteStore for PgStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DatabaseError> {
        profile::get_profile(&self.pool, user_id).await
    }

    async fn fetch_chapter_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChapterProgress>, DatabaseError> {
        chapter_progress::get_chapter_progress(&self.pool, user_id).await
    }

    async fn fetch_exercise_responses(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ExerciseResponse>, DatabaseError> {
        exercise_response::get_exercise_responses(&self.pool, user_id).await
    }

    async fn fetch_achievements(&self, user_id: Uuid) -> Result<Vec<Achievement>, DatabaseError> {
        achievement::get_achievements(&self.pool, user_id).await
    }

    async fn fetch_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AppNotification>, DatabaseError> {
        notification::get_notifications(&self.pool, user_id).await
    }

    async fn fetch_chapters(&self) -> Result<Vec<Chapter>, DatabaseError> {
        chapter::get_chapters(&self.pool).await
    }

    async fn upsert_chapter_progress(
        &self,
        user_id: Uuid,
        upsert: &ChapterProgressUpsert,
    ) -> Result<(), DatabaseError> {
        chapter_progress::upsert_chapter_progress(&self.pool, user_id, upsert).await
    }

    async fn upsert_exercise_response(
        &self,
        user_id: Uuid,
        upsert: &ExerciseResponseUpsert,
    ) -> Result<(), DatabaseError> {
        exercise_response::upsert_exercise_response(&self.pool, user_id, upsert).await
    }

    async fn mark_notifications_read(
        &self,
        user_id: Uuid,
        ids: &[i64],
    ) -> Result<u64, DatabaseError> {
        notification::mark_notifications_read(&self.pool, user_id, ids).await
    }

    async fn update_profile_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<UserProfile, DatabaseError> {
        profile::update_profile_name(&self.pool, user_id, name).await
    }

    async fn fetch_support_tickets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicket>, DatabaseError> {
        support_ticket::get_support_tickets(&self.pool, user_id).await
    }

    async fn create_support_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<SupportTicket, DatabaseError> {
        support_ticket::create_support_ticket(&self.pool, user_id, subject, message).await
    }
}

impl AccountStore for PgStore {
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>, DatabaseError> {
        account::find_account_by_email(&self.pool, email).await
    }

    async fn find_account_by_id(&self, user_id: Uuid) -> Result<Option<Account>, DatabaseError> {
        account::find_account_by_id(&self.pool, user_id).await
    }

    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, DatabaseError> {
        account::create_account(&self.pool, email, password_hash).await
    }
}
