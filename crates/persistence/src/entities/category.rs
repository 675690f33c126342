//! Category entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the categories table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryEntity {
    pub id: Uuid,
    pub name: String,
}

impl From<CategoryEntity> for domain::models::Category {
    fn from(entity: CategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}
