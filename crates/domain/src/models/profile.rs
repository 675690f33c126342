//! Restaurant staff profile domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a staff member within their restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Owner,
    Manager,
    Staff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Manager => "manager",
            StaffRole::Staff => "staff",
        }
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(StaffRole::Owner),
            "manager" => Ok(StaffRole::Manager),
            "staff" => Ok(StaffRole::Staff),
            _ => Err(format!("Invalid staff role: {}", s)),
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Links a staff user to the single restaurant they manage.
///
/// This association is the sole authorization boundary for restaurant-side
/// features; a user has at most one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub role: StaffRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_role_as_str() {
        assert_eq!(StaffRole::Owner.as_str(), "owner");
        assert_eq!(StaffRole::Manager.as_str(), "manager");
        assert_eq!(StaffRole::Staff.as_str(), "staff");
    }

    #[test]
    fn test_staff_role_from_str() {
        assert_eq!(StaffRole::from_str("owner").unwrap(), StaffRole::Owner);
        assert_eq!(StaffRole::from_str("MANAGER").unwrap(), StaffRole::Manager);
        assert_eq!(StaffRole::from_str("Staff").unwrap(), StaffRole::Staff);
        assert!(StaffRole::from_str("intern").is_err());
    }

    #[test]
    fn test_staff_role_display() {
        assert_eq!(format!("{}", StaffRole::Owner), "owner");
    }
}
