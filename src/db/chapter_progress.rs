use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{model::ChapterProgress, remote::ChapterProgressUpsert};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct ChapterProgressEntity {
    chapter_id: i32,
    is_completed: bool,
    progress_percentage: i16,
    last_accessed_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ChapterProgressEntity> for ChapterProgress {
    type Error = DatabaseError;

    fn try_from(entity: ChapterProgressEntity) -> Result<Self, Self::Error> {
        let progress = u8::try_from(entity.progress_percentage).map_err(|_| {
            DatabaseError::InvalidRow(format!(
                "progress {} is out of range",
                entity.progress_percentage
            ))
        })?;

        Ok(ChapterProgress {
            chapter_id: entity.chapter_id,
            completed: entity.is_completed,
            progress,
            last_accessed: entity.last_accessed_at,
            completed_at: entity.completed_at,
        })
    }
}

#[tracing::instrument(name = "get chapter progress", skip_all, fields(user_id = %user_id))]
pub async fn get_chapter_progress(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ChapterProgress>, DatabaseError> {
    let rows = sqlx::query_as::<_, ChapterProgressEntity>(
        r#"
        SELECT
            chapter_id, is_completed, progress_percentage,
            last_accessed_at, completed_at
        FROM
            user_progress
        WHERE
            user_id = $1
        ORDER BY
            chapter_id
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ChapterProgress::try_from).collect()
}

#[tracing::instrument(
    name = "upsert chapter progress",
    skip_all,
    fields(user_id = %user_id, chapter_id = upsert.chapter_id)
)]
pub async fn upsert_chapter_progress(
    pool: &PgPool,
    user_id: Uuid,
    upsert: &ChapterProgressUpsert,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO user_progress
            (user_id, chapter_id, is_completed, progress_percentage, last_accessed_at, completed_at)
        VALUES
            (
                $1, $2, COALESCE($3, FALSE),
                CASE WHEN COALESCE($3, FALSE) THEN 100 ELSE COALESCE($4, 0) END,
                $5, $6
            )
        ON CONFLICT (user_id, chapter_id)
        DO UPDATE SET
            is_completed = COALESCE($3, user_progress.is_completed),
            progress_percentage = CASE
                WHEN COALESCE($3, user_progress.is_completed) THEN 100
                ELSE COALESCE($4, user_progress.progress_percentage)
            END,
            last_accessed_at = EXCLUDED.last_accessed_at,
            completed_at = COALESCE(EXCLUDED.completed_at, user_progress.completed_at);
    "#,
    )
    .bind(user_id)
    .bind(upsert.chapter_id)
    .bind(upsert.completed)
    .bind(upsert.progress.map(i16::from))
    .bind(upsert.last_accessed_at)
    .bind(upsert.completed_at)
    .execute(pool)
    .await?;

    Ok(())
}
