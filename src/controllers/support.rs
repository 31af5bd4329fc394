use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::Error,
    model::{Account, SupportTicket},
    remote::RemoteStore,
    state::SharedAppState,
};

#[derive(serde::Serialize, serde::Deserialize, Validate, Debug)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200, message = "Subject length must be between 1 and 200"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Message length must be between 1 and 5000"))]
    pub message: String,
}

#[tracing::instrument(name = "[GET] support tickets", skip_all)]
pub async fn index<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
) -> Result<Json<Vec<SupportTicket>>, Error>
where
    B: RemoteStore,
{
    let tickets = app_state.backend.fetch_support_tickets(account.id).await?;

    Ok(Json(tickets))
}

#[tracing::instrument(name = "[POST] support tickets", skip_all)]
pub async fn store<B>(
    State(app_state): State<SharedAppState<B>>,
    Extension(account): Extension<Arc<Account>>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), Error>
where
    B: RemoteStore,
{
    let request = CreateTicketRequest {
        subject: request.subject.trim().to_string(),
        message: request.message.trim().to_string(),
    };
    request.validate().map_err(Error::Validation)?;

    let ticket = app_state
        .backend
        .create_support_ticket(account.id, &request.subject, &request.message)
        .await?;
    tracing::info!(ticket_id = ticket.id, "Support ticket opened");

    Ok((StatusCode::CREATED, Json(ticket)))
}
