//! Cart routes.
//!
//! The plain endpoints keep the browser flow's redirect semantics; the
//! `/json` variants return the mutation result for page scripts. Both are
//! driven by the pure `domain::models::Cart`, with `CartRepository` only
//! persisting the outcome.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use persistence::repositories::{CartRepository, DishRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CartSession;

/// One resolved cart line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewItem {
    pub dish_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub qty: u32,
    pub line_total: Decimal,
}

/// The resolved cart with per-line and grand totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewResponse {
    pub items: Vec<CartViewItem>,
    pub total: Decimal,
    pub cart_count: u32,
}

/// Result of a cart mutation, for the JSON endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationResponse {
    pub dish_id: Uuid,
    pub qty: u32,
    pub cart_count: u32,
}

/// Form body for quantity updates.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub qty: Option<i64>,
}

fn with_session_cookie(state: &AppState, session: CartSession, mut response: Response) -> Response {
    session.write_cookie(&state.cookies, response.headers_mut());
    response
}

/// GET /cart
///
/// Resolves the cart against current availability and prices. Dishes that
/// were deleted or made unavailable since being added silently drop out of
/// the totals.
pub async fn view_cart(
    State(state): State<AppState>,
    session: CartSession,
) -> Result<Response, ApiError> {
    let lines = CartRepository::new(state.pool.clone())
        .resolve_lines(session.id)
        .await?;

    let items: Vec<CartViewItem> = lines
        .into_iter()
        .map(|line| {
            let qty = line.quantity.max(0) as u32;
            let line_total = line.price * Decimal::from(qty);
            CartViewItem {
                dish_id: line.dish_id,
                name: line.name,
                price: line.price,
                qty,
                line_total,
            }
        })
        .collect();

    let total: Decimal = items.iter().map(|item| item.line_total).sum();
    let cart_count: u32 = items.iter().map(|item| item.qty).sum();

    let response = Json(CartViewResponse {
        items,
        total,
        cart_count,
    })
    .into_response();
    Ok(with_session_cookie(&state, session, response))
}

/// Shared add logic: enforces the single-restaurant invariant and persists
/// the incremented quantity. Returns the new quantity and cart count.
async fn add_dish(
    state: &AppState,
    session: CartSession,
    dish_id: Uuid,
) -> Result<(u32, u32), ApiError> {
    let dish = DishRepository::new(state.pool.clone())
        .find_available(dish_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dish not found".to_string()))?;

    let carts = CartRepository::new(state.pool.clone());
    let mut cart = carts.load(session.id).await?;

    let qty = cart.add(dish.id, dish.restaurant_id)?;
    carts.set_quantity(session.id, dish.id, qty).await?;

    Ok((qty, cart.count()))
}

/// POST /cart/add/{dish_id}
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: CartSession,
    Path(dish_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    match add_dish(&state, session, dish_id).await {
        Ok(_) => Ok(with_session_cookie(
            &state,
            session,
            Redirect::to("/app").into_response(),
        )),
        // Browser flow: surface the cross-restaurant conflict on the cart page
        Err(ApiError::Validation(_)) => Ok(with_session_cookie(
            &state,
            session,
            Redirect::to("/cart").into_response(),
        )),
        Err(err) => Err(err),
    }
}

/// POST /cart/add/{dish_id}/json
pub async fn add_to_cart_json(
    State(state): State<AppState>,
    session: CartSession,
    Path(dish_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (qty, cart_count) = add_dish(&state, session, dish_id).await?;

    let response = Json(CartMutationResponse {
        dish_id,
        qty,
        cart_count,
    })
    .into_response();
    Ok(with_session_cookie(&state, session, response))
}

/// Shared update logic. Setting a non-positive quantity removes the entry;
/// there is deliberately no restaurant check on this path.
async fn update_dish_qty(
    state: &AppState,
    session: CartSession,
    dish_id: Uuid,
    qty: i64,
) -> Result<(u32, u32), ApiError> {
    let carts = CartRepository::new(state.pool.clone());
    let mut cart = carts.load(session.id).await?;

    let new_qty = cart.update(dish_id, qty);
    if new_qty == 0 {
        carts.remove_item(session.id, dish_id).await?;
    } else {
        carts.set_quantity(session.id, dish_id, new_qty).await?;
    }

    Ok((new_qty, cart.count()))
}

/// POST /cart/update/{dish_id}
pub async fn update_cart(
    State(state): State<AppState>,
    session: CartSession,
    Path(dish_id): Path<Uuid>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, ApiError> {
    update_dish_qty(&state, session, dish_id, form.qty.unwrap_or(1)).await?;
    Ok(with_session_cookie(
        &state,
        session,
        Redirect::to("/cart").into_response(),
    ))
}

/// POST /cart/update/{dish_id}/json
pub async fn update_cart_json(
    State(state): State<AppState>,
    session: CartSession,
    Path(dish_id): Path<Uuid>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, ApiError> {
    let (qty, cart_count) = update_dish_qty(&state, session, dish_id, form.qty.unwrap_or(1)).await?;

    let response = Json(CartMutationResponse {
        dish_id,
        qty,
        cart_count,
    })
    .into_response();
    Ok(with_session_cookie(&state, session, response))
}

/// POST /cart/remove/{dish_id}
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: CartSession,
    Path(dish_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    CartRepository::new(state.pool.clone())
        .remove_item(session.id, dish_id)
        .await?;
    Ok(with_session_cookie(
        &state,
        session,
        Redirect::to("/cart").into_response(),
    ))
}

/// POST /cart/clear
pub async fn clear_cart(
    State(state): State<AppState>,
    session: CartSession,
) -> Result<Response, ApiError> {
    CartRepository::new(state.pool.clone())
        .clear(session.id)
        .await?;
    Ok(with_session_cookie(
        &state,
        session,
        Redirect::to("/app").into_response(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cart_view_totals() {
        let items = [
            CartViewItem {
                dish_id: Uuid::new_v4(),
                name: "Dosa".to_string(),
                price: Decimal::from_str("120.00").unwrap(),
                qty: 2,
                line_total: Decimal::from_str("240.00").unwrap(),
            },
            CartViewItem {
                dish_id: Uuid::new_v4(),
                name: "Coffee".to_string(),
                price: Decimal::from_str("30.00").unwrap(),
                qty: 1,
                line_total: Decimal::from_str("30.00").unwrap(),
            },
        ];
        let total: Decimal = items.iter().map(|i| i.line_total).sum();
        assert_eq!(total, Decimal::from_str("270.00").unwrap());
    }

    #[test]
    fn test_mutation_response_shape() {
        let response = CartMutationResponse {
            dish_id: Uuid::nil(),
            qty: 3,
            cart_count: 5,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("dishId"));
        assert!(json.contains("cartCount"));
        assert!(json.contains("\"qty\":3"));
    }

    #[test]
    fn test_update_form_defaults() {
        let form: UpdateCartForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.qty.unwrap_or(1), 1);
    }
}
