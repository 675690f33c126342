//! Order and order-item domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How the customer pays.
///
/// Online payment is the only method that marks the order paid at creation;
/// everything else settles on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::Online => "ONLINE",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, PaymentMethod::Online)
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COD" => Ok(PaymentMethod::CashOnDelivery),
            "ONLINE" => Ok(PaymentMethod::Online),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A placed order: an immutable snapshot of one checkout.
///
/// Only `is_paid` may change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub delivery_latitude: Option<Decimal>,
    pub delivery_longitude: Option<Decimal>,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

/// One line of an order, with the dish's price frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub dish_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Input for creating an order line.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub dish_id: Uuid,
    pub quantity: i32,
    /// The dish's current price, frozen onto the line.
    pub price: Decimal,
}

/// Input for the checkout engine.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub delivery_latitude: Option<Decimal>,
    pub delivery_longitude: Option<Decimal>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Pre-tax order total: Σ(unit price × quantity).
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Whether this checkout settles immediately.
    pub fn is_paid(&self) -> bool {
        self.payment_method.is_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: &str, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            dish_id: Uuid::new_v4(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    fn order_with(lines: Vec<NewOrderLine>, method: PaymentMethod) -> NewOrder {
        NewOrder {
            user_id: None,
            customer_name: "Guest".to_string(),
            customer_phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            delivery_latitude: None,
            delivery_longitude: None,
            payment_method: method,
            lines,
        }
    }

    #[test]
    fn test_payment_method_round_trip() {
        assert_eq!(
            PaymentMethod::from_str("cod").unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert_eq!(
            PaymentMethod::from_str("ONLINE").unwrap(),
            PaymentMethod::Online
        );
        assert!(PaymentMethod::from_str("CHEQUE").is_err());
        assert_eq!(PaymentMethod::CashOnDelivery.as_str(), "COD");
    }

    #[test]
    fn test_only_online_marks_paid() {
        assert!(order_with(vec![], PaymentMethod::Online).is_paid());
        assert!(!order_with(vec![], PaymentMethod::CashOnDelivery).is_paid());
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let order = order_with(
            vec![line("150.00", 2), line("45.50", 3)],
            PaymentMethod::CashOnDelivery,
        );
        assert_eq!(order.total(), "436.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_total_of_empty_order_is_zero() {
        let order = order_with(vec![], PaymentMethod::CashOnDelivery);
        assert_eq!(order.total(), Decimal::ZERO);
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            dish_id: Uuid::new_v4(),
            quantity: 4,
            price: "99.25".parse().unwrap(),
        };
        assert_eq!(item.line_total(), "397.00".parse::<Decimal>().unwrap());
    }
}
