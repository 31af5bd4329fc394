use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};

use crate::{
    exercise::Exercise,
    model::{Chapter, DEFAULT_ESTIMATED_TIME, DEFAULT_ICON, DEFAULT_MEDAL_ICON},
};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct ChapterEntity {
    id: i32,
    order_index: i32,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    medal_icon: Option<String>,
    estimated_time: Option<String>,
    is_premium: bool,
    content: Option<Json<serde_json::Value>>,
    exercises: Option<Json<Vec<Exercise>>>,
}

impl From<ChapterEntity> for Chapter {
    fn from(entity: ChapterEntity) -> Self {
        Chapter {
            id: entity.id,
            order_index: entity.order_index,
            title: entity.title,
            subtitle: entity.subtitle.unwrap_or_default(),
            description: entity.description.unwrap_or_default(),
            icon: entity.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            medal_icon: entity
                .medal_icon
                .unwrap_or_else(|| DEFAULT_MEDAL_ICON.to_string()),
            estimated_time: entity
                .estimated_time
                .unwrap_or_else(|| DEFAULT_ESTIMATED_TIME.to_string()),
            is_premium: entity.is_premium,
            content: entity.content.map(|c| c.0).unwrap_or_default(),
            exercises: entity.exercises.map(|e| e.0).unwrap_or_default(),
        }
    }
}

#[tracing::instrument(name = "get chapters", skip_all)]
pub async fn get_chapters(pool: &PgPool) -> Result<Vec<Chapter>, DatabaseError> {
    let rows = sqlx::query_as::<_, ChapterEntity>(
        r#"
        SELECT
            id, order_index, title,
            subtitle, description, icon,
            medal_icon, estimated_time, is_premium,
            content, exercises
        FROM
            chapters
        ORDER BY
            order_index
    "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Chapter::from).collect())
}

/// Inserts catalog chapters that are not present yet. Existing rows are left alone.
#[tracing::instrument(name = "seed chapters", skip_all, fields(count = chapters.len()))]
pub async fn seed_chapters(pool: &PgPool, chapters: &[Chapter]) -> Result<u64, DatabaseError> {
    if chapters.is_empty() {
        return Ok(0);
    }

    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        INSERT INTO chapters
            (id, order_index, title, subtitle, description, icon, medal_icon, estimated_time, is_premium, content, exercises)
    "#,
    );

    query_builder.push_values(chapters, |mut b, chapter| {
        b.push_bind(chapter.id)
            .push_bind(chapter.order_index)
            .push_bind(chapter.title.clone())
            .push_bind(chapter.subtitle.clone())
            .push_bind(chapter.description.clone())
            .push_bind(chapter.icon.clone())
            .push_bind(chapter.medal_icon.clone())
            .push_bind(chapter.estimated_time.clone())
            .push_bind(chapter.is_premium)
            .push_bind(Json(chapter.content.clone()))
            .push_bind(Json(chapter.exercises.clone()));
    });
    query_builder.push(" ON CONFLICT (id) DO NOTHING;");

    let result = query_builder.build().execute(pool).await?;

    Ok(result.rows_affected())
}
