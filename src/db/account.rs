use sqlx::PgPool;
use uuid::Uuid;

use crate::{model::Account, remote::default_profile_name};

use super::{error::DatabaseError, profile::insert_profile};

#[derive(sqlx::FromRow)]
struct AccountEntity {
    id: Uuid,
    email: String,
    password: String,
}

#[tracing::instrument(name = "find account by email", skip_all, fields(email))]
pub async fn find_account_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(Account, String)>, DatabaseError> {
    let entity = sqlx::query_as::<_, AccountEntity>(
        r#"
        SELECT
            id, email, password
        FROM
            users
        WHERE
            email = $1
    "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(entity.map(|row| {
        (
            Account {
                id: row.id,
                email: row.email,
            },
            row.password,
        )
    }))
}

#[tracing::instrument(name = "find account by id", skip_all, fields(user_id = %user_id))]
pub async fn find_account_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Account>, DatabaseError> {
    let entity = sqlx::query_as::<_, AccountEntity>(
        r#"
        SELECT
            id, email, password
        FROM
            users
        WHERE
            id = $1
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(entity.map(|row| Account {
        id: row.id,
        email: row.email,
    }))
}

#[tracing::instrument(name = "create account", skip_all, fields(email))]
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<Account, DatabaseError> {
    let user_id = Uuid::new_v4();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users
            (id, email, password)
        VALUES
            ($1, $2, $3)
    "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(password_hash)
    .execute(&mut *tx)
    .await?;

    insert_profile(&mut tx, user_id, email, &default_profile_name(email)).await?;

    tx.commit().await?;

    Ok(Account {
        id: user_id,
        email: email.to_string(),
    })
}
