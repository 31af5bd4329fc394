use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::exercise::{Exercise, ExerciseData};

pub type ChapterId = i32;

pub const DEFAULT_ICON: &str = "📖";
pub const DEFAULT_MEDAL_ICON: &str = "🏅";
pub const DEFAULT_ESTIMATED_TIME: &str = "15 min";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Free,
    Premium,
    Trial,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "free",
            SubscriptionStatus::Premium => "premium",
            SubscriptionStatus::Trial => "trial",
        }
    }

    pub fn has_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Premium | SubscriptionStatus::Trial)
    }
}

impl TryFrom<&str> for SubscriptionStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "trial" => Ok(Self::Trial),
            other => Err(format!("{} is not a supported subscription status.", other)),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Iniciante,
    Praticante,
    Avancado,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Iniciante => "iniciante",
            Level::Praticante => "praticante",
            Level::Avancado => "avancado",
        }
    }
}

impl TryFrom<&str> for Level {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "iniciante" => Ok(Self::Iniciante),
            "praticante" => Ok(Self::Praticante),
            "avancado" => Ok(Self::Avancado),
            other => Err(format!("{} is not a supported level.", other)),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub subscription_status: SubscriptionStatus,
    pub level: Level,
    pub total_completed_chapters: i32,
}

/// Credential-side identity of a signed-in user. The profile row is separate
/// and may not exist yet.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChapterProgress {
    pub chapter_id: ChapterId,
    pub completed: bool,
    pub progress: u8,
    pub last_accessed: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseResponse {
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub response: ExerciseData,
    pub completed_at: DateTime<Utc>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: i64,
    pub user_id: Uuid,
    pub chapter_id: ChapterId,
    pub achieved_at: DateTime<Utc>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Achievement,
    Reminder,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Achievement => "achievement",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        }
    }
}

impl TryFrom<&str> for NotificationType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "achievement" => Ok(Self::Achievement),
            "reminder" => Ok(Self::Reminder),
            "system" => Ok(Self::System),
            other => Err(format!("{} is not a supported notification type.", other)),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<ChapterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medal_icon: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppNotification {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub metadata: NotificationMetadata,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Aberto,
    EmProgresso,
    Fechado,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Aberto => "aberto",
            TicketStatus::EmProgresso => "em_progresso",
            TicketStatus::Fechado => "fechado",
        }
    }
}

impl TryFrom<&str> for TicketStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "aberto" => Ok(Self::Aberto),
            "em_progresso" => Ok(Self::EmProgresso),
            "fechado" => Ok(Self::Fechado),
            other => Err(format!("{} is not a supported ticket status.", other)),
        }
    }
}

/// A support request. New tickets start `aberto`; staff move them along.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SupportTicket {
    pub id: i64,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: ChapterId,
    pub order_index: i32,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_medal_icon")]
    pub medal_icon: String,
    #[serde(default = "default_estimated_time")]
    pub estimated_time: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Chapter {
    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_medal_icon() -> String {
    DEFAULT_MEDAL_ICON.to_string()
}

fn default_estimated_time() -> String {
    DEFAULT_ESTIMATED_TIME.to_string()
}

/// A catalog chapter joined with the session's progress state.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChapterOverview {
    pub id: ChapterId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub icon: String,
    pub medal_icon: String,
    pub estimated_time: String,
    pub is_premium: bool,
    pub is_locked: bool,
    pub is_completed: bool,
    pub progress: u8,
}

/// Partial chapter progress write. Absent fields keep their stored value.
#[derive(
    serde::Serialize, serde::Deserialize, validator::Validate, Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub struct ChapterProgressUpdate {
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    #[validate(range(max = 100))]
    pub progress: Option<u8>,
}

impl ChapterProgressUpdate {
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            progress: Some(100),
        }
    }
}
