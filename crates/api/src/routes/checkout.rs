//! Checkout: turns the session cart into a persisted order.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{NewOrder, NewOrderLine, Order, PaymentMethod};
use domain::services::{render_pdf, InvoiceLine};
use persistence::entities::CartLineEntity;
use persistence::repositories::{
    CartRepository, OrderRepository, RestaurantRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CartSession, UserAuth};
use crate::middleware::metrics::{record_invoice_rendered, record_order_placed};

/// Checkout form fields. Everything is optional with the same defaults the
/// storefront has always used; malformed coordinates are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_latitude: Option<String>,
    pub delivery_longitude: Option<String>,
    pub payment: Option<String>,
}

/// One line of the checkout preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub dish_id: Uuid,
    pub name: String,
    pub qty: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

/// GET /checkout payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreview {
    pub items: Vec<CheckoutItem>,
    pub total: Decimal,
}

fn preview_items(lines: &[CartLineEntity]) -> Vec<CheckoutItem> {
    lines
        .iter()
        .map(|line| CheckoutItem {
            dish_id: line.dish_id,
            name: line.name.clone(),
            qty: line.quantity,
            price: line.price,
            line_total: line.price * Decimal::from(line.quantity),
        })
        .collect()
}

/// GET /checkout
///
/// Totals preview; an empty cart bounces back to the catalog with no error
/// surfaced.
pub async fn checkout_preview(
    State(state): State<AppState>,
    _auth: UserAuth,
    session: CartSession,
) -> Result<Response, ApiError> {
    let lines = CartRepository::new(state.pool.clone())
        .resolve_lines(session.id)
        .await?;

    if lines.is_empty() {
        return Ok(Redirect::to("/app").into_response());
    }

    let items = preview_items(&lines);
    let total = items.iter().map(|item| item.line_total).sum();
    Ok(Json(CheckoutPreview { items, total }).into_response())
}

/// POST /checkout
///
/// Creates the order atomically, clears the cart, then renders and emails
/// the invoice on a best-effort basis.
pub async fn checkout(
    State(state): State<AppState>,
    auth: UserAuth,
    session: CartSession,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, ApiError> {
    let carts = CartRepository::new(state.pool.clone());
    let lines = carts.resolve_lines(session.id).await?;

    if lines.is_empty() {
        return Ok(Redirect::to("/app").into_response());
    }

    // All line items must share one restaurant; the cart's add guard makes
    // this unreachable, so a violation here is corrupt state worth failing on.
    let mut restaurant_ids: Vec<Uuid> = lines.iter().map(|line| line.restaurant_id).collect();
    restaurant_ids.sort();
    restaurant_ids.dedup();
    let restaurant_id = match restaurant_ids.as_slice() {
        [single] => *single,
        _ => {
            return Err(ApiError::Validation(
                "Cart contains dishes from more than one restaurant.".to_string(),
            ))
        }
    };

    let payment_method = form
        .payment
        .as_deref()
        .and_then(|value| PaymentMethod::from_str(value).ok())
        .unwrap_or(PaymentMethod::CashOnDelivery);

    let new_order = NewOrder {
        user_id: Some(auth.user_id),
        customer_name: form
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Guest".to_string()),
        customer_phone: form.phone.unwrap_or_default(),
        address: form.address.unwrap_or_default(),
        delivery_latitude: form
            .delivery_latitude
            .and_then(|v| Decimal::from_str(v.trim()).ok()),
        delivery_longitude: form
            .delivery_longitude
            .and_then(|v| Decimal::from_str(v.trim()).ok()),
        payment_method,
        lines: lines
            .iter()
            .map(|line| NewOrderLine {
                dish_id: line.dish_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect(),
    };

    let order = OrderRepository::new(state.pool.clone())
        .create_with_items(&new_order)
        .await?;
    record_order_placed();

    carts.clear(session.id).await?;

    info!(
        order_id = %order.id,
        user_id = %auth.user_id,
        total = %order.total_amount,
        "Order placed"
    );

    let order_id = order.id;
    send_invoice_best_effort(&state, order.into(), &lines, restaurant_id).await;

    let mut response = Redirect::to(&format!("/invoice/{}", order_id)).into_response();
    session.write_cookie(&state.cookies, response.headers_mut());
    Ok(response)
}

/// Renders the invoice PDF and emails it to the purchasing user. Every
/// failure is logged and swallowed: invoice delivery never fails a checkout
/// that has already been committed.
async fn send_invoice_best_effort(
    state: &AppState,
    order: Order,
    lines: &[CartLineEntity],
    restaurant_id: Uuid,
) {
    if !state.email.is_enabled() {
        return;
    }

    let user = match UserRepository::new(state.pool.clone())
        .find_by_id(order.user_id.unwrap_or_default())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(err) => {
            warn!(order_id = %order.id, error = %err, "Invoice email skipped: user lookup failed");
            return;
        }
    };
    let Some(email) = user.email.clone() else {
        return;
    };

    let restaurant = match RestaurantRepository::new(state.pool.clone())
        .find_by_id(restaurant_id)
        .await
    {
        Ok(Some(restaurant)) => restaurant.into(),
        Ok(None) => {
            warn!(order_id = %order.id, "Invoice email skipped: restaurant is gone");
            return;
        }
        Err(err) => {
            warn!(order_id = %order.id, error = %err, "Invoice email skipped: restaurant lookup failed");
            return;
        }
    };

    let invoice_lines: Vec<InvoiceLine> = lines
        .iter()
        .map(|line| InvoiceLine {
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        })
        .collect();

    let pdf_bytes = match render_pdf(&order, &invoice_lines, &restaurant) {
        Ok(bytes) => {
            record_invoice_rendered();
            bytes
        }
        Err(err) => {
            warn!(order_id = %order.id, error = %err, "Invoice PDF rendering failed");
            return;
        }
    };

    if let Err(err) = state.email.send_invoice_email(&email, order.id, pdf_bytes).await {
        warn!(order_id = %order.id, error = %err, "Invoice email delivery failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: &str, quantity: i32) -> CartLineEntity {
        CartLineEntity {
            dish_id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            name: "Dish".to_string(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_preview_totals_match_checkout_example() {
        // Cart {dish_42: 2}, price 150.00 -> total 300.00
        let lines = vec![line("150.00", 2)];
        let items = preview_items(&lines);
        let total: Decimal = items.iter().map(|i| i.line_total).sum();
        assert_eq!(total, "300.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_unknown_payment_method_defaults_to_cod() {
        let parsed = Some("GIFTCARD")
            .and_then(|value| PaymentMethod::from_str(value).ok())
            .unwrap_or(PaymentMethod::CashOnDelivery);
        assert_eq!(parsed, PaymentMethod::CashOnDelivery);
        assert!(!parsed.is_online());
    }

    #[test]
    fn test_online_payment_method_parses() {
        let parsed = Some("ONLINE")
            .and_then(|value| PaymentMethod::from_str(value).ok())
            .unwrap_or(PaymentMethod::CashOnDelivery);
        assert!(parsed.is_online());
    }

    #[test]
    fn test_checkout_form_all_fields_optional() {
        let form: CheckoutForm = serde_json::from_str("{}").unwrap();
        assert!(form.name.is_none());
        assert!(form.payment.is_none());
    }
}
