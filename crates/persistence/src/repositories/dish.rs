//! Dish repository: catalog search and staff-side menu management.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use domain::models::{DishFilter, SortKey};

use crate::entities::{CatalogDishEntity, DishEntity};
use crate::metrics::QueryTimer;

/// Payload for creating a dish on a restaurant's menu.
#[derive(Debug, Clone)]
pub struct NewDish {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub is_veg: bool,
    pub is_available: bool,
    pub rating: Decimal,
}

/// Payload for editing a dish. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDish {
    pub category_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_veg: Option<bool>,
    pub is_available: Option<bool>,
    pub rating: Option<Decimal>,
}

/// Repository for dish database operations.
#[derive(Clone)]
pub struct DishRepository {
    pool: PgPool,
}

impl DishRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an available dish of an active restaurant. Used by the cart's
    /// add path, where an unavailable dish must read as not-found.
    pub async fn find_available(&self, id: Uuid) -> Result<Option<DishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_available_dish");
        let result = sqlx::query_as::<_, DishEntity>(
            r#"
            SELECT d.id, d.restaurant_id, d.category_id, d.name, d.description,
                   d.price, d.is_veg, d.is_available, d.rating, d.created_at
            FROM dishes d
            JOIN restaurants r ON r.id = d.restaurant_id
            WHERE d.id = $1 AND d.is_available = TRUE AND r.is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Catalog search over available dishes of active restaurants.
    ///
    /// The free-text query matches dish name, description, or restaurant
    /// name as a case-insensitive substring; band and rating filters follow
    /// `DishFilter` semantics. Default order is by dish name so results are
    /// stable without an explicit sort key.
    pub async fn search(&self, filter: &DishFilter) -> Result<Vec<CatalogDishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("search_dishes");

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT d.id, d.restaurant_id, r.name AS restaurant_name, \
             d.category_id, c.name AS category_name, d.name, d.description, \
             d.price, d.is_veg, d.rating \
             FROM dishes d \
             JOIN restaurants r ON r.id = d.restaurant_id \
             LEFT JOIN categories c ON c.id = d.category_id \
             WHERE d.is_available = TRUE AND r.is_active = TRUE",
        );

        if let Some(restaurant_id) = filter.restaurant_id {
            qb.push(" AND d.restaurant_id = ");
            qb.push_bind(restaurant_id);
        }

        if let Some(query) = &filter.query {
            let pattern = format!("%{}%", query);
            qb.push(" AND (d.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR d.description ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR r.name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(veg) = filter.veg {
            qb.push(" AND d.is_veg = ");
            qb.push_bind(veg.is_veg());
        }

        if let Some(min_rating) = filter.min_rating {
            qb.push(" AND d.rating >= ");
            qb.push_bind(min_rating);
        }

        if let Some(band) = filter.price_band {
            let (low, high) = band.bounds();
            if let Some(low) = low {
                qb.push(" AND d.price > ");
                qb.push_bind(low);
            }
            if let Some(high) = high {
                qb.push(" AND d.price <= ");
                qb.push_bind(high);
            }
        }

        qb.push(match filter.sort {
            Some(SortKey::PriceAsc) => " ORDER BY d.price ASC, d.name ASC",
            Some(SortKey::PriceDesc) => " ORDER BY d.price DESC, d.name ASC",
            Some(SortKey::RatingDesc) => " ORDER BY d.rating DESC, d.name ASC",
            None => " ORDER BY d.name ASC",
        });

        let result = qb
            .build_query_as::<CatalogDishEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// All dishes of one restaurant ordered by name, for the staff menu
    /// view (includes unavailable dishes).
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: Uuid,
    ) -> Result<Vec<DishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_dishes_for_restaurant");
        let result = sqlx::query_as::<_, DishEntity>(
            r#"
            SELECT id, restaurant_id, category_id, name, description,
                   price, is_veg, is_available, rating, created_at
            FROM dishes
            WHERE restaurant_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a dish on a restaurant's menu.
    pub async fn create(
        &self,
        restaurant_id: Uuid,
        dish: &NewDish,
    ) -> Result<DishEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_dish");
        let result = sqlx::query_as::<_, DishEntity>(
            r#"
            INSERT INTO dishes (restaurant_id, category_id, name, description,
                                price, is_veg, is_available, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, restaurant_id, category_id, name, description,
                      price, is_veg, is_available, rating, created_at
            "#,
        )
        .bind(restaurant_id)
        .bind(dish.category_id)
        .bind(&dish.name)
        .bind(&dish.description)
        .bind(dish.price)
        .bind(dish.is_veg)
        .bind(dish.is_available)
        .bind(dish.rating)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a dish, scoped to the owning restaurant. Returns `None` when
    /// the dish does not exist under that restaurant, so a staff caller can
    /// never reach across restaurants.
    pub async fn update(
        &self,
        dish_id: Uuid,
        restaurant_id: Uuid,
        changes: &UpdateDish,
    ) -> Result<Option<DishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_dish");

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE dishes SET id = id");
        if let Some(category_id) = &changes.category_id {
            qb.push(", category_id = ");
            qb.push_bind(*category_id);
        }
        if let Some(name) = &changes.name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        if let Some(price) = changes.price {
            qb.push(", price = ");
            qb.push_bind(price);
        }
        if let Some(is_veg) = changes.is_veg {
            qb.push(", is_veg = ");
            qb.push_bind(is_veg);
        }
        if let Some(is_available) = changes.is_available {
            qb.push(", is_available = ");
            qb.push_bind(is_available);
        }
        if let Some(rating) = changes.rating {
            qb.push(", rating = ");
            qb.push_bind(rating);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(dish_id);
        qb.push(" AND restaurant_id = ");
        qb.push_bind(restaurant_id);
        qb.push(
            " RETURNING id, restaurant_id, category_id, name, description, \
             price, is_veg, is_available, rating, created_at",
        );

        let result = qb
            .build_query_as::<DishEntity>()
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Delete a dish, scoped to the owning restaurant. Returns whether a
    /// row was removed.
    pub async fn delete(&self, dish_id: Uuid, restaurant_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_dish");
        let result = sqlx::query(
            r#"DELETE FROM dishes WHERE id = $1 AND restaurant_id = $2"#,
        )
        .bind(dish_id)
        .bind(restaurant_id)
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected() > 0);
        timer.record();
        result
    }
}
