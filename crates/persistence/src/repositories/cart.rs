//! Cart repository: the session store behind `domain::models::Cart`.
//!
//! Cart rows live in `cart_items`, keyed by the session UUID from the
//! browser cookie. The repository only persists state; the single-restaurant
//! invariant is enforced by the domain cart before any write happens.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Cart;

use crate::entities::{CartItemEntity, CartLineEntity};
use crate::metrics::QueryTimer;

/// Repository for session cart persistence.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the session's cart. Rows are returned oldest-first so the first
    /// added dish keeps binding the cart's restaurant.
    pub async fn load(&self, session_id: Uuid) -> Result<Cart, sqlx::Error> {
        let timer = QueryTimer::new("load_cart");
        let rows = sqlx::query_as::<_, CartItemEntity>(
            r#"
            SELECT ci.dish_id, d.restaurant_id, ci.quantity
            FROM cart_items ci
            JOIN dishes d ON d.id = ci.dish_id
            WHERE ci.session_id = $1
            ORDER BY ci.added_at ASC, ci.dish_id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let rows = rows?;
        Ok(Cart::from_rows(rows.into_iter().map(|row| {
            (row.dish_id, row.restaurant_id, row.quantity)
        })))
    }

    /// Resolve the session's cart against current dish availability and
    /// price. Deleted or unavailable dishes simply produce no line.
    pub async fn resolve_lines(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<CartLineEntity>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_cart_lines");
        let result = sqlx::query_as::<_, CartLineEntity>(
            r#"
            SELECT ci.dish_id, d.restaurant_id, d.name, d.price, ci.quantity
            FROM cart_items ci
            JOIN dishes d ON d.id = ci.dish_id AND d.is_available = TRUE
            JOIN restaurants r ON r.id = d.restaurant_id AND r.is_active = TRUE
            WHERE ci.session_id = $1
            ORDER BY ci.added_at ASC, ci.dish_id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Write one entry's quantity (insert or overwrite).
    pub async fn set_quantity(
        &self,
        session_id: Uuid,
        dish_id: Uuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_cart_quantity");
        sqlx::query(
            r#"
            INSERT INTO cart_items (session_id, dish_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id, dish_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(session_id)
        .bind(dish_id)
        .bind(quantity as i32)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Remove one entry; no-op when absent.
    pub async fn remove_item(&self, session_id: Uuid, dish_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("remove_cart_item");
        sqlx::query(r#"DELETE FROM cart_items WHERE session_id = $1 AND dish_id = $2"#)
            .bind(session_id)
            .bind(dish_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    /// Drop every entry for the session (explicit clear or post-checkout).
    pub async fn clear(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("clear_cart");
        sqlx::query(r#"DELETE FROM cart_items WHERE session_id = $1"#)
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}
