//! Support ticket domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            _ => Err(format!("Invalid ticket status: {}", s)),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-authored support request.
///
/// Immutable after creation except for staff-performed status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
        ] {
            assert_eq!(TicketStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_from_str_invalid() {
        assert!(TicketStatus::from_str("closed").is_err());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
