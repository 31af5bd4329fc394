use chrono::{DateTime, Utc};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    exercise::{ExerciseData, ExerciseKind},
    model::ExerciseResponse,
    remote::ExerciseResponseUpsert,
};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct ExerciseResponseEntity {
    chapter_id: i32,
    exercise_id: String,
    exercise_type: String,
    response_data: Json<serde_json::Value>,
    completed_at: DateTime<Utc>,
}

impl TryFrom<ExerciseResponseEntity> for ExerciseResponse {
    type Error = DatabaseError;

    fn try_from(entity: ExerciseResponseEntity) -> Result<Self, Self::Error> {
        let kind =
            ExerciseKind::try_from(entity.exercise_type.as_str()).map_err(DatabaseError::InvalidRow)?;
        let response = ExerciseData::from_payload(kind, entity.response_data.0).map_err(|e| {
            DatabaseError::InvalidRow(format!(
                "response for {}:{} does not match {}: {}",
                entity.chapter_id, entity.exercise_id, kind, e
            ))
        })?;

        Ok(ExerciseResponse {
            chapter_id: entity.chapter_id,
            exercise_id: entity.exercise_id,
            response,
            completed_at: entity.completed_at,
        })
    }
}

#[tracing::instrument(name = "get exercise responses", skip_all, fields(user_id = %user_id))]
pub async fn get_exercise_responses(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ExerciseResponse>, DatabaseError> {
    let rows = sqlx::query_as::<_, ExerciseResponseEntity>(
        r#"
        SELECT
            chapter_id, exercise_id, exercise_type,
            response_data, completed_at
        FROM
            exercise_responses
        WHERE
            user_id = $1
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ExerciseResponse::try_from).collect()
}

#[tracing::instrument(
    name = "upsert exercise response",
    skip_all,
    fields(user_id = %user_id, chapter_id = upsert.chapter_id, exercise_id = %upsert.exercise_id)
)]
pub async fn upsert_exercise_response(
    pool: &PgPool,
    user_id: Uuid,
    upsert: &ExerciseResponseUpsert,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO exercise_responses
            (user_id, chapter_id, exercise_id, exercise_type, response_data, is_completed, completed_at)
        VALUES
            ($1, $2, $3, $4, $5, TRUE, $6)
        ON CONFLICT (user_id, chapter_id, exercise_id)
        DO UPDATE SET
            exercise_type = EXCLUDED.exercise_type,
            response_data = EXCLUDED.response_data,
            is_completed = TRUE,
            completed_at = EXCLUDED.completed_at;
    "#,
    )
    .bind(user_id)
    .bind(upsert.chapter_id)
    .bind(&upsert.exercise_id)
    .bind(upsert.exercise_type.as_str())
    .bind(Json(&upsert.response_data))
    .bind(upsert.completed_at)
    .execute(pool)
    .await?;

    Ok(())
}
