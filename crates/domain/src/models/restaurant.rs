//! Restaurant domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A restaurant on the platform.
///
/// Deactivated restaurants stay in the database but disappear from the
/// public catalog together with all their dishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Restaurant {
    /// Whether the restaurant has a usable pickup location for ETA lookups.
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn restaurant(lat: Option<&str>, lng: Option<&str>) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: "Udupi Grand".to_string(),
            address: "12 MG Road".to_string(),
            is_active: true,
            latitude: lat.map(|v| Decimal::from_str(v).unwrap()),
            longitude: lng.map(|v| Decimal::from_str(v).unwrap()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_location_requires_both_coordinates() {
        assert!(restaurant(Some("12.9716"), Some("77.5946")).has_location());
        assert!(!restaurant(Some("12.9716"), None).has_location());
        assert!(!restaurant(None, Some("77.5946")).has_location());
        assert!(!restaurant(None, None).has_location());
    }
}
