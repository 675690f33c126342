//! Cart entities (database row mappings).
//!
//! Cart rows are the session store for `domain::models::Cart`; the session
//! id comes from the browser cookie, not from a user account.

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// One stored cart row, joined with the dish's restaurant for rebinding the
/// in-memory cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemEntity {
    pub dish_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity: i32,
}

/// A cart row resolved against the dish's *current* price and name, used by
/// the cart view and checkout. Unavailable or deleted dishes never produce
/// a row.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineEntity {
    pub dish_id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}
