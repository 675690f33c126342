//! Category repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CategoryEntity;
use crate::metrics::QueryTimer;

/// Repository for dish category database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name, for dish-form selection widgets.
    pub async fn list_all(&self) -> Result<Vec<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_categories");
        let result = sqlx::query_as::<_, CategoryEntity>(
            r#"SELECT id, name FROM categories ORDER BY name ASC"#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_category_by_id");
        let result =
            sqlx::query_as::<_, CategoryEntity>(r#"SELECT id, name FROM categories WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }
}
