//! Restaurant entity (database row mapping).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the restaurants table.
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantEntity {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<RestaurantEntity> for domain::models::Restaurant {
    fn from(entity: RestaurantEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            is_active: entity.is_active,
            latitude: entity.latitude,
            longitude: entity.longitude,
            created_at: entity.created_at,
        }
    }
}
