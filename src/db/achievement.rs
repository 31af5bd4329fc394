use sqlx::PgPool;
use uuid::Uuid;

use crate::model::Achievement;

use super::error::DatabaseError;

#[tracing::instrument(name = "get achievements", skip_all, fields(user_id = %user_id))]
pub async fn get_achievements(pool: &PgPool, user_id: Uuid) -> Result<Vec<Achievement>, DatabaseError> {
    let rows = sqlx::query_as::<_, (i64, Uuid, i32, chrono::DateTime<chrono::Utc>)>(
        r#"
        SELECT
            id, user_id, chapter_id, achieved_at
        FROM
            achievements
        WHERE
            user_id = $1
        ORDER BY
            achieved_at, id
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, user_id, chapter_id, achieved_at)| Achievement {
            id,
            user_id,
            chapter_id,
            achieved_at,
        })
        .collect())
}
