//! Support ticket routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use domain::models::{SupportTicket, TicketStatus};
use persistence::repositories::TicketRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{StaffCaller, UserAuth};

/// Request body for filing a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Request body for a staff status transition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /help payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListResponse {
    pub tickets: Vec<SupportTicket>,
}

/// GET /help
///
/// The caller's tickets, newest first.
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<TicketListResponse>, ApiError> {
    let tickets = TicketRepository::new(state.pool.clone())
        .list_for_user(auth.user_id)
        .await?;

    Ok(Json(TicketListResponse {
        tickets: tickets.into_iter().map(Into::into).collect(),
    }))
}

/// POST /help
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let subject = request.subject.unwrap_or_default().trim().to_string();
    let message = request.message.unwrap_or_default().trim().to_string();

    if subject.is_empty() || message.is_empty() {
        return Err(ApiError::Validation("Please fill all fields.".to_string()));
    }

    let ticket = TicketRepository::new(state.pool.clone())
        .create(auth.user_id, &subject, &message)
        .await?;

    info!(ticket_id = %ticket.id, user_id = %auth.user_id, "Support ticket filed");

    Ok((StatusCode::CREATED, Json(ticket.into())))
}

/// POST /help/{ticket_id}/status
///
/// Staff-only status transition; tickets are otherwise immutable.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Path(ticket_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    let status = TicketStatus::from_str(&request.status)
        .map_err(|e| ApiError::Validation(e))?;

    let ticket = TicketRepository::new(state.pool.clone())
        .update_status(ticket_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    info!(
        ticket_id = %ticket_id,
        status = %status,
        staff_user = %caller.user_id(),
        "Ticket status updated"
    );

    Ok(Json(ticket.into()))
}
