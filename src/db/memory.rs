//! In-process store with the same keys, conflict rules and completion trigger
//! as the PostgreSQL schema. Backs the `memory` storage mode.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    exercise::{ExerciseData, ExerciseKind},
    model::{
        Account, Achievement, AppNotification, Chapter, ChapterId, ChapterProgress,
        DEFAULT_MEDAL_ICON, ExerciseResponse, Level, NotificationMetadata, NotificationType,
        SubscriptionStatus, SupportTicket, TicketStatus, UserProfile,
    },
    remote::{
        AccountStore, ChapterProgressUpsert, ExerciseResponseUpsert, RemoteStore,
        default_profile_name,
    },
};

use super::error::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Profiles,
    Chapters,
    UserProgress,
    ExerciseResponses,
    Achievements,
    Notifications,
    SupportTickets,
}

struct StoredResponse {
    exercise_type: ExerciseKind,
    response_data: serde_json::Value,
    completed_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, (Account, String)>,
    profiles: HashMap<Uuid, UserProfile>,
    chapters: Vec<Chapter>,
    progress: BTreeMap<(Uuid, ChapterId), ChapterProgress>,
    responses: BTreeMap<(Uuid, ChapterId, String), StoredResponse>,
    achievements: Vec<Achievement>,
    notifications: Vec<AppNotification>,
    tickets: Vec<SupportTicket>,
    next_achievement_id: i64,
    next_notification_id: i64,
    next_ticket_id: i64,
    failing: HashSet<Table>,
}

impl Tables {
    fn check(&self, table: Table) -> Result<(), DatabaseError> {
        if self.failing.contains(&table) {
            return Err(DatabaseError::Unavailable(format!("{:?} is unavailable", table)));
        }
        Ok(())
    }

    fn insert_notification(
        &mut self,
        user_id: Uuid,
        kind: NotificationType,
        title: String,
        message: String,
        metadata: NotificationMetadata,
    ) -> i64 {
        self.next_notification_id += 1;
        let id = self.next_notification_id;
        self.notifications.push(AppNotification {
            id,
            user_id,
            title,
            message,
            is_read: false,
            created_at: Utc::now(),
            kind,
            metadata,
        });
        id
    }

    /// Mirrors the achievement half of the `on_chapter_completed` trigger.
    fn on_chapter_completed(&mut self, user_id: Uuid, chapter_id: ChapterId) {
        let exists = self
            .achievements
            .iter()
            .any(|a| a.user_id == user_id && a.chapter_id == chapter_id);

        if !exists {
            self.next_achievement_id += 1;
            self.achievements.push(Achievement {
                id: self.next_achievement_id,
                user_id,
                chapter_id,
                achieved_at: Utc::now(),
            });

            let chapter = self.chapters.iter().find(|c| c.id == chapter_id);
            let title = chapter
                .map(|c| c.title.clone())
                .unwrap_or_else(|| chapter_id.to_string());
            let medal_icon = chapter
                .map(|c| c.medal_icon.clone())
                .unwrap_or_else(|| DEFAULT_MEDAL_ICON.to_string());

            self.insert_notification(
                user_id,
                NotificationType::Achievement,
                "Conquista desbloqueada!".to_string(),
                format!("Você concluiu o capítulo \"{}\".", title),
                NotificationMetadata {
                    chapter_id: Some(chapter_id),
                    medal_icon: Some(medal_icon),
                },
            );
        }
    }

    /// Mirrors the counter half of the trigger, run whenever completion flips.
    fn recount_completed_chapters(&mut self, user_id: Uuid) {
        let completed = self
            .progress
            .iter()
            .filter(|((owner, _), p)| *owner == user_id && p.completed)
            .count();
        if let Some(profile) = self.profiles.get_mut(&user_id) {
            profile.total_completed_chapters = completed as i32;
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_chapters(chapters: Vec<Chapter>) -> Self {
        let store = Self::new();
        store.replace_chapters(chapters).await;
        store
    }

    pub async fn replace_chapters(&self, mut chapters: Vec<Chapter>) {
        chapters.sort_by_key(|c| c.order_index);
        self.tables.lock().await.chapters = chapters;
    }

    /// Makes every read and write against `table` fail until restored.
    pub async fn fail_table(&self, table: Table) {
        self.tables.lock().await.failing.insert(table);
    }

    pub async fn restore_table(&self, table: Table) {
        self.tables.lock().await.failing.remove(&table);
    }

    pub async fn put_profile(&self, profile: UserProfile) {
        self.tables.lock().await.profiles.insert(profile.id, profile);
    }

    pub async fn remove_profile(&self, user_id: Uuid) -> Option<UserProfile> {
        self.tables.lock().await.profiles.remove(&user_id)
    }

    pub async fn set_subscription(&self, user_id: Uuid, status: SubscriptionStatus) -> bool {
        match self.tables.lock().await.profiles.get_mut(&user_id) {
            Some(profile) => {
                profile.subscription_status = status;
                true
            }
            None => false,
        }
    }

    /// Server-side notification delivery, e.g. reminders.
    pub async fn push_notification(
        &self,
        user_id: Uuid,
        kind: NotificationType,
        title: &str,
        message: &str,
    ) -> i64 {
        self.tables.lock().await.insert_notification(
            user_id,
            kind,
            title.to_string(),
            message.to_string(),
            NotificationMetadata::default(),
        )
    }

    pub async fn progress_rows(&self, user_id: Uuid) -> usize {
        self.tables
            .lock()
            .await
            .progress
            .keys()
            .filter(|(owner, _)| *owner == user_id)
            .count()
    }
}

impl RemoteStore for MemoryStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Profiles)?;

        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn fetch_chapter_progress(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ChapterProgress>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::UserProgress)?;

        Ok(tables
            .progress
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn fetch_exercise_responses(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ExerciseResponse>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::ExerciseResponses)?;

        tables
            .responses
            .iter()
            .filter(|((owner, _, _), _)| *owner == user_id)
            .map(|((_, chapter_id, exercise_id), stored)| {
                let response =
                    ExerciseData::from_payload(stored.exercise_type, stored.response_data.clone())
                        .map_err(|e| DatabaseError::InvalidRow(e.to_string()))?;

                Ok(ExerciseResponse {
                    chapter_id: *chapter_id,
                    exercise_id: exercise_id.clone(),
                    response,
                    completed_at: stored.completed_at,
                })
            })
            .collect()
    }

    async fn fetch_achievements(&self, user_id: Uuid) -> Result<Vec<Achievement>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Achievements)?;

        Ok(tables
            .achievements
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AppNotification>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Notifications)?;

        let mut notifications: Vec<AppNotification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notifications)
    }

    async fn fetch_chapters(&self) -> Result<Vec<Chapter>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Chapters)?;

        Ok(tables.chapters.clone())
    }

    async fn upsert_chapter_progress(
        &self,
        user_id: Uuid,
        upsert: &ChapterProgressUpsert,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::UserProgress)?;

        if let Some(progress) = upsert.progress {
            if progress > 100 {
                return Err(DatabaseError::Unavailable(format!(
                    "progress {} violates user_progress check",
                    progress
                )));
            }
        }

        let key = (user_id, upsert.chapter_id);
        let previous = tables.progress.get(&key).cloned();
        let was_completed = previous.as_ref().map(|p| p.completed).unwrap_or(false);

        let completed = upsert.completed.unwrap_or(was_completed);
        let progress = if completed {
            100
        } else {
            upsert
                .progress
                .or(previous.as_ref().map(|p| p.progress))
                .unwrap_or(0)
        };
        let completed_at = upsert
            .completed_at
            .or(previous.as_ref().and_then(|p| p.completed_at));

        tables.progress.insert(
            key,
            ChapterProgress {
                chapter_id: upsert.chapter_id,
                completed,
                progress,
                last_accessed: upsert.last_accessed_at,
                completed_at,
            },
        );

        if completed && !was_completed {
            tables.on_chapter_completed(user_id, upsert.chapter_id);
        }
        if previous.is_none() || completed != was_completed {
            tables.recount_completed_chapters(user_id);
        }

        Ok(())
    }

    async fn upsert_exercise_response(
        &self,
        user_id: Uuid,
        upsert: &ExerciseResponseUpsert,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::ExerciseResponses)?;

        tables.responses.insert(
            (user_id, upsert.chapter_id, upsert.exercise_id.clone()),
            StoredResponse {
                exercise_type: upsert.exercise_type,
                response_data: upsert.response_data.clone(),
                completed_at: upsert.completed_at,
            },
        );

        Ok(())
    }

    async fn mark_notifications_read(
        &self,
        user_id: Uuid,
        ids: &[i64],
    ) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::Notifications)?;

        let mut updated = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && ids.contains(&n.id))
        {
            notification.is_read = true;
            updated += 1;
        }

        Ok(updated)
    }

    async fn update_profile_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<UserProfile, DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::Profiles)?;

        match tables.profiles.get_mut(&user_id) {
            Some(profile) => {
                profile.name = name.to_string();
                Ok(profile.clone())
            }
            None => Err(DatabaseError::NotFound),
        }
    }

    async fn fetch_support_tickets(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicket>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::SupportTickets)?;

        Ok(tables
            .tickets
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_support_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<SupportTicket, DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::SupportTickets)?;

        tables.next_ticket_id += 1;
        let now = Utc::now();
        let ticket = SupportTicket {
            id: tables.next_ticket_id,
            user_id,
            subject: subject.to_string(),
            message: message.to_string(),
            status: TicketStatus::Aberto,
            created_at: now,
            updated_at: now,
        };
        tables.tickets.push(ticket.clone());

        Ok(ticket)
    }
}

impl AccountStore for MemoryStore {
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Users)?;

        Ok(tables
            .users
            .values()
            .find(|(account, _)| account.email == email)
            .cloned())
    }

    async fn find_account_by_id(&self, user_id: Uuid) -> Result<Option<Account>, DatabaseError> {
        let tables = self.tables.lock().await;
        tables.check(Table::Users)?;

        Ok(tables.users.get(&user_id).map(|(account, _)| account.clone()))
    }

    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, DatabaseError> {
        let mut tables = self.tables.lock().await;
        tables.check(Table::Users)?;

        if tables.users.values().any(|(account, _)| account.email == email) {
            return Err(DatabaseError::Unavailable(format!(
                "users.email {} already exists",
                email
            )));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        tables
            .users
            .insert(account.id, (account.clone(), password_hash.to_string()));
        tables.profiles.insert(
            account.id,
            UserProfile {
                id: account.id,
                email: email.to_string(),
                name: default_profile_name(email),
                subscription_status: SubscriptionStatus::Free,
                level: Level::Iniciante,
                total_completed_chapters: 0,
            },
        );

        Ok(account)
    }
}
