//! Support ticket repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::TicketStatus;

use crate::entities::SupportTicketEntity;
use crate::metrics::QueryTimer;

/// Repository for support ticket database operations.
#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a new ticket; tickets always start open.
    pub async fn create(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<SupportTicketEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_ticket");
        let result = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            INSERT INTO support_tickets (user_id, subject, message, status)
            VALUES ($1, $2, $3, 'open')
            RETURNING id, user_id, subject, message, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The user's tickets, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SupportTicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tickets_for_user");
        let result = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            SELECT id, user_id, subject, message, status, created_at
            FROM support_tickets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Staff-performed status transition. Returns the updated ticket, or
    /// `None` when it does not exist.
    pub async fn update_status(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> Result<Option<SupportTicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_ticket_status");
        let result = sqlx::query_as::<_, SupportTicketEntity>(
            r#"
            UPDATE support_tickets
            SET status = $1
            WHERE id = $2
            RETURNING id, user_id, subject, message, status, created_at
            "#,
        )
        .bind(status.as_str())
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
