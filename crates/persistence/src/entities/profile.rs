//! Restaurant staff profile entity (database row mapping).

use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::StaffRole;

/// Database row mapping for the restaurant_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantProfileEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub role: String,
}

impl From<RestaurantProfileEntity> for domain::models::RestaurantProfile {
    fn from(entity: RestaurantProfileEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            restaurant_id: entity.restaurant_id,
            // The column has a CHECK constraint; fallback matches its default
            role: StaffRole::from_str(&entity.role).unwrap_or(StaffRole::Owner),
        }
    }
}
