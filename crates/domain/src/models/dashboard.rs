//! Restaurant dashboard metric types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the all-time popularity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TopDish {
    pub dish_id: Uuid,
    pub name: String,
    pub total_quantity: i64,
}

/// Daily sales rollup for one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardMetrics {
    /// Distinct orders containing at least one of the restaurant's dishes,
    /// created on the current local calendar date.
    pub today_orders: i64,
    /// Σ(price × quantity) over today's matching order items.
    pub today_revenue: Decimal,
    /// Average current dish rating, one decimal; 0 when the menu is empty.
    pub average_rating: Decimal,
    /// Top 5 dishes by all-time ordered quantity, ties broken by name.
    pub top_dishes: Vec<TopDish>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_serialize_snake_case() {
        let metrics = DashboardMetrics {
            today_orders: 3,
            today_revenue: "870.00".parse().unwrap(),
            average_rating: "4.2".parse().unwrap(),
            top_dishes: vec![TopDish {
                dish_id: Uuid::new_v4(),
                name: "Masala Dosa".to_string(),
                total_quantity: 41,
            }],
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("today_orders"));
        assert!(json.contains("today_revenue"));
        assert!(json.contains("top_dishes"));
        assert!(json.contains("generated_at"));
    }
}
