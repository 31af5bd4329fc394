use chrono::{DateTime, Utc};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::model::{AppNotification, NotificationMetadata, NotificationType};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct NotificationEntity {
    id: i64,
    user_id: Uuid,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
    #[sqlx(rename = "type")]
    kind: String,
    metadata: Option<Json<NotificationMetadata>>,
}

impl TryFrom<NotificationEntity> for AppNotification {
    type Error = DatabaseError;

    fn try_from(entity: NotificationEntity) -> Result<Self, Self::Error> {
        Ok(AppNotification {
            id: entity.id,
            user_id: entity.user_id,
            title: entity.title,
            message: entity.message,
            is_read: entity.is_read,
            created_at: entity.created_at,
            kind: NotificationType::try_from(entity.kind.as_str())
                .map_err(DatabaseError::InvalidRow)?,
            metadata: entity.metadata.map(|m| m.0).unwrap_or_default(),
        })
    }
}

#[tracing::instrument(name = "get notifications", skip_all, fields(user_id = %user_id))]
pub async fn get_notifications(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AppNotification>, DatabaseError> {
    let rows = sqlx::query_as::<_, NotificationEntity>(
        r#"
        SELECT
            id, user_id, title, message,
            is_read, created_at, type, metadata
        FROM
            notifications
        WHERE
            user_id = $1
        ORDER BY
            created_at DESC, id DESC
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AppNotification::try_from).collect()
}

#[tracing::instrument(name = "mark notifications read", skip_all, fields(user_id = %user_id, count = ids.len()))]
pub async fn mark_notifications_read(
    pool: &PgPool,
    user_id: Uuid,
    ids: &[i64],
) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET
            is_read = TRUE
        WHERE
            user_id = $1
            AND id = ANY($2)
    "#,
    )
    .bind(user_id)
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
