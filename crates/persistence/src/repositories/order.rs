//! Order repository: atomic checkout, history, and invoice lookups.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::NewOrder;

use crate::entities::{OrderEntity, OrderItemDetailEntity, RestaurantEntity};
use crate::metrics::QueryTimer;

/// Repository for order database operations.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with all its items in one transaction.
    ///
    /// Either the order and every line land together or nothing is written;
    /// a failure on any insert rolls the whole checkout back.
    pub async fn create_with_items(&self, order: &NewOrder) -> Result<OrderEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_order_with_items");
        let total = order.total();

        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, OrderEntity>(
            r#"
            INSERT INTO orders (user_id, customer_name, customer_phone, address,
                                delivery_latitude, delivery_longitude,
                                payment_method, total_amount, is_paid)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, customer_name, customer_phone, address,
                      delivery_latitude, delivery_longitude, payment_method,
                      total_amount, is_paid, created_at
            "#,
        )
        .bind(order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.address)
        .bind(order.delivery_latitude)
        .bind(order.delivery_longitude)
        .bind(order.payment_method.as_str())
        .bind(total)
        .bind(order.is_paid())
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, dish_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(created.id)
            .bind(line.dish_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Find an order owned by the given user.
    pub async fn find_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_order_for_user");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, user_id, customer_name, customer_phone, address,
                   delivery_latitude, delivery_longitude, payment_method,
                   total_amount, is_paid, created_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The order's items joined with their dish names, oldest line first.
    pub async fn items_with_dish_names(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("order_items_with_dish_names");
        let result = sqlx::query_as::<_, OrderItemDetailEntity>(
            r#"
            SELECT oi.id, oi.order_id, oi.dish_id, d.name AS dish_name,
                   oi.quantity, oi.price
            FROM order_items oi
            JOIN dishes d ON d.id = oi.dish_id
            WHERE oi.order_id = $1
            ORDER BY d.name ASC, oi.id ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The distinct restaurants the order's items belong to.
    ///
    /// The checkout engine guarantees exactly one; a different count means
    /// corrupt data and the caller must refuse to render an invoice from it.
    pub async fn restaurants_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<RestaurantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("restaurants_for_order");
        let result = sqlx::query_as::<_, RestaurantEntity>(
            r#"
            SELECT DISTINCT r.id, r.name, r.address, r.is_active,
                   r.latitude, r.longitude, r.created_at
            FROM restaurants r
            JOIN dishes d ON d.restaurant_id = r.id
            JOIN order_items oi ON oi.dish_id = d.id
            WHERE oi.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A page of the user's order history, newest first. `after` is the
    /// cursor position of the previous page's last row.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_orders_for_user");
        let result = match after {
            Some((created_at, id)) => {
                sqlx::query_as::<_, OrderEntity>(
                    r#"
                    SELECT id, user_id, customer_name, customer_phone, address,
                           delivery_latitude, delivery_longitude, payment_method,
                           total_amount, is_paid, created_at
                    FROM orders
                    WHERE user_id = $1 AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                    "#,
                )
                .bind(user_id)
                .bind(created_at)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, OrderEntity>(
                    r#"
                    SELECT id, user_id, customer_name, customer_phone, address,
                           delivery_latitude, delivery_longitude, payment_method,
                           total_amount, is_paid, created_at
                    FROM orders
                    WHERE user_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }
}
