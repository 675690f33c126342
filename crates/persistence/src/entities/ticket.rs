//! Support ticket entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::TicketStatus;

/// Database row mapping for the support_tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct SupportTicketEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<SupportTicketEntity> for domain::models::SupportTicket {
    fn from(entity: SupportTicketEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            subject: entity.subject,
            message: entity.message,
            status: TicketStatus::from_str(&entity.status).unwrap_or(TicketStatus::Open),
            created_at: entity.created_at,
        }
    }
}
