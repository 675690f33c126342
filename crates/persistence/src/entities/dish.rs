//! Dish entities (database row mappings).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the dishes table.
#[derive(Debug, Clone, FromRow)]
pub struct DishEntity {
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

impl From<DishEntity> for domain::models::Dish {
    fn from(entity: DishEntity) -> Self {
        Self {
            id: entity.id,
            restaurant_id: entity.restaurant_id,
            category_id: entity.category_id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            is_veg: entity.is_veg,
            is_available: entity.is_available,
            rating: entity.rating,
            created_at: entity.created_at,
        }
    }
}

/// Catalog listing row: a dish joined with its restaurant and category
/// names.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogDishEntity {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub is_veg: bool,
    pub rating: Decimal,
}

impl From<CatalogDishEntity> for domain::models::CatalogDish {
    fn from(entity: CatalogDishEntity) -> Self {
        Self {
            id: entity.id,
            restaurant_id: entity.restaurant_id,
            restaurant_name: entity.restaurant_name,
            category_id: entity.category_id,
            category_name: entity.category_name,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            is_veg: entity.is_veg,
            rating: entity.rating,
        }
    }
}
