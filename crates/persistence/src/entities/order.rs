//! Order entities (database row mappings).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::PaymentMethod;

/// Database row mapping for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub delivery_latitude: Option<Decimal>,
    pub delivery_longitude: Option<Decimal>,
    pub payment_method: String,
    pub total_amount: Decimal,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<OrderEntity> for domain::models::Order {
    fn from(entity: OrderEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            customer_name: entity.customer_name,
            customer_phone: entity.customer_phone,
            address: entity.address,
            delivery_latitude: entity.delivery_latitude,
            delivery_longitude: entity.delivery_longitude,
            payment_method: PaymentMethod::from_str(&entity.payment_method)
                .unwrap_or(PaymentMethod::CashOnDelivery),
            total_amount: entity.total_amount,
            is_paid: entity.is_paid,
            created_at: entity.created_at,
        }
    }
}

/// Order item joined with its dish name, for invoice display.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemDetailEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub dish_id: Uuid,
    pub dish_name: String,
    pub quantity: i32,
    pub price: Decimal,
}
