//! Restaurant repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RestaurantEntity;
use crate::metrics::QueryTimer;

/// Repository for restaurant database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a restaurant by ID regardless of its active flag.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_restaurant_by_id");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            SELECT id, name, address, is_active, latitude, longitude, created_at
            FROM restaurants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an active restaurant by ID. Deactivated restaurants behave as
    /// not-found for all public flows.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_restaurant");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            SELECT id, name, address, is_active, latitude, longitude, created_at
            FROM restaurants
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All active restaurants ordered by name, for the catalog sidebar.
    pub async fn list_active(&self) -> Result<Vec<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_restaurants");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            SELECT id, name, address, is_active, latitude, longitude, created_at
            FROM restaurants
            WHERE is_active = TRUE
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
