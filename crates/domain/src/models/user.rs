//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer or staff account.
///
/// Platform administrators are flagged with `is_admin`; restaurant staff are
/// identified by the presence of a [`super::RestaurantProfile`], not by a
/// field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "asha".to_string(),
            email: Some("asha@example.com".to_string()),
            password_hash: "$argon2id$secret".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("asha"));
    }
}
