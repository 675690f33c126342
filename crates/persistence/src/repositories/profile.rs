//! Restaurant staff profile repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RestaurantProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for restaurant profile lookups.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the staff profile for a user. At most one exists per user; its
    /// absence means the user has no restaurant access at all.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<RestaurantProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_user");
        let result = sqlx::query_as::<_, RestaurantProfileEntity>(
            r#"
            SELECT id, user_id, restaurant_id, role
            FROM restaurant_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
