use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::{SupportTicket, TicketStatus};

use super::error::DatabaseError;

#[derive(sqlx::FromRow)]
struct SupportTicketEntity {
    id: i64,
    user_id: Uuid,
    subject: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupportTicketEntity> for SupportTicket {
    type Error = DatabaseError;

    fn try_from(entity: SupportTicketEntity) -> Result<Self, Self::Error> {
        Ok(SupportTicket {
            id: entity.id,
            user_id: entity.user_id,
            subject: entity.subject,
            message: entity.message,
            status: TicketStatus::try_from(entity.status.as_str())
                .map_err(DatabaseError::InvalidRow)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[tracing::instrument(name = "get support tickets", skip_all, fields(user_id = %user_id))]
pub async fn get_support_tickets(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SupportTicket>, DatabaseError> {
    let rows = sqlx::query_as::<_, SupportTicketEntity>(
        r#"
        SELECT
            id, user_id, subject, message,
            status, created_at, updated_at
        FROM
            support_tickets
        WHERE
            user_id = $1
        ORDER BY
            created_at DESC, id DESC
    "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(SupportTicket::try_from).collect()
}

#[tracing::instrument(name = "create support ticket", skip_all, fields(user_id = %user_id))]
pub async fn create_support_ticket(
    pool: &PgPool,
    user_id: Uuid,
    subject: &str,
    message: &str,
) -> Result<SupportTicket, DatabaseError> {
    let row = sqlx::query_as::<_, SupportTicketEntity>(
        r#"
        INSERT INTO support_tickets
            (user_id, subject, message, status)
        VALUES
            ($1, $2, $3, $4)
        RETURNING
            id, user_id, subject, message,
            status, created_at, updated_at
    "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(message)
    .bind(TicketStatus::Aberto.as_str())
    .fetch_one(pool)
    .await?;

    SupportTicket::try_from(row)
}
