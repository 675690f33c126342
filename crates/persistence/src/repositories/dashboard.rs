//! Dashboard metrics repository for restaurant sales rollups.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domain::models::{DashboardMetrics, TopDish};

use crate::metrics::QueryTimer;

/// Repository for restaurant dashboard aggregation.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compute the dashboard rollup for one restaurant.
    ///
    /// `day_start`/`day_end` are the UTC bounds of the caller's local
    /// calendar date; the queries themselves stay timezone-agnostic.
    pub async fn metrics(
        &self,
        restaurant_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<DashboardMetrics, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_metrics");

        let (today, average_rating, top_dishes) = tokio::try_join!(
            self.today_sales(restaurant_id, day_start, day_end),
            self.average_rating(restaurant_id),
            self.top_dishes(restaurant_id),
        )?;
        let (today_orders, today_revenue) = today;

        timer.record();
        Ok(DashboardMetrics {
            today_orders,
            today_revenue,
            average_rating,
            top_dishes,
            generated_at: Utc::now(),
        })
    }

    /// Distinct order count and revenue over the restaurant's order items
    /// created inside the day window.
    async fn today_sales(
        &self,
        restaurant_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<(i64, Decimal), sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT oi.order_id) AS today_orders,
                   COALESCE(SUM(oi.price * oi.quantity), 0) AS revenue
            FROM order_items oi
            JOIN dishes d ON d.id = oi.dish_id
            JOIN orders o ON o.id = oi.order_id
            WHERE d.restaurant_id = $1
              AND o.created_at >= $2
              AND o.created_at < $3
            "#,
        )
        .bind(restaurant_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;

        Ok((
            row.get::<i64, _>("today_orders"),
            row.get::<Decimal, _>("revenue"),
        ))
    }

    /// Average current dish rating, rounded to one decimal; 0 for an empty
    /// menu.
    async fn average_rating(&self, restaurant_id: Uuid) -> Result<Decimal, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(ROUND(AVG(rating), 1), 0) AS average_rating
            FROM dishes
            WHERE restaurant_id = $1
            "#,
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<Decimal, _>("average_rating"))
    }

    /// Top 5 dishes by all-time ordered quantity; ties resolve by name so
    /// the ranking is deterministic.
    async fn top_dishes(&self, restaurant_id: Uuid) -> Result<Vec<TopDish>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT oi.dish_id, d.name, SUM(oi.quantity)::BIGINT AS total_quantity
            FROM order_items oi
            JOIN dishes d ON d.id = oi.dish_id
            WHERE d.restaurant_id = $1
            GROUP BY oi.dish_id, d.name
            ORDER BY total_quantity DESC, d.name ASC
            LIMIT 5
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopDish {
                dish_id: row.get("dish_id"),
                name: row.get("name"),
                total_quantity: row.get("total_quantity"),
            })
            .collect())
    }
}
