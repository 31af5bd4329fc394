use sqlx::PgPool;
use uuid::Uuid;

use crate::model::{Level, SubscriptionStatus, UserProfile};

use super::{PostgresTransaction, error::DatabaseError};

#[derive(sqlx::FromRow)]
struct ProfileEntity {
    id: Uuid,
    email: String,
    name: Option<String>,
    subscription_status: String,
    level: String,
    total_completed_chapters: i32,
}

impl TryFrom<ProfileEntity> for UserProfile {
    type Error = DatabaseError;

    fn try_from(entity: ProfileEntity) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: entity.id,
            email: entity.email,
            name: entity.name.unwrap_or_default(),
            subscription_status: SubscriptionStatus::try_from(entity.subscription_status.as_str())
                .map_err(DatabaseError::InvalidRow)?,
            level: Level::try_from(entity.level.as_str()).map_err(DatabaseError::InvalidRow)?,
            total_completed_chapters: entity.total_completed_chapters,
        })
    }
}

#[tracing::instrument(name = "get profile", skip_all, fields(user_id = %user_id))]
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, DatabaseError> {
    let entity = sqlx::query_as::<_, ProfileEntity>(
        r#"
        SELECT
            id, email, name,
            subscription_status, level, total_completed_chapters
        FROM
            profiles
        WHERE
            id = $1
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    entity.map(UserProfile::try_from).transpose()
}

#[tracing::instrument(name = "update profile name", skip_all, fields(user_id = %user_id))]
pub async fn update_profile_name(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
) -> Result<UserProfile, DatabaseError> {
    let entity = sqlx::query_as::<_, ProfileEntity>(
        r#"
        UPDATE profiles
        SET
            name = $1
        WHERE
            id = $2
        RETURNING
            id, email, name,
            subscription_status, level, total_completed_chapters
    "#,
    )
    .bind(name)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match entity {
        Some(entity) => UserProfile::try_from(entity),
        None => Err(DatabaseError::NotFound),
    }
}

pub async fn insert_profile(
    tx: &mut PostgresTransaction,
    user_id: Uuid,
    email: &str,
    name: &str,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO profiles
            (id, email, name, subscription_status, level)
        VALUES
            ($1, $2, $3, $4, $5)
    "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(name)
    .bind(SubscriptionStatus::Free.as_str())
    .bind(Level::Iniciante.as_str())
    .execute(&mut **tx)
    .await?;

    Ok(())
}
