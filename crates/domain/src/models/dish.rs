//! Dish domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dish on a restaurant's menu.
///
/// `price` carries two decimal places, `rating` one; both are NUMERIC in
/// the database and never touch floating point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub is_veg: bool,
    pub is_available: bool,
    pub rating: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_dish_serializes_camel_case() {
        let dish = Dish {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            category_id: None,
            name: "Masala Dosa".to_string(),
            description: "Crisp, with potato filling".to_string(),
            price: Decimal::from_str("120.00").unwrap(),
            is_veg: true,
            is_available: true,
            rating: Decimal::from_str("4.5").unwrap(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&dish).unwrap();
        assert!(json.contains("isVeg"));
        assert!(json.contains("isAvailable"));
        assert!(json.contains("\"120.00\"") || json.contains("120.00"));
    }
}
