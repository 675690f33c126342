//! Order history and invoice routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::Order;
use domain::services::{render_pdf, InvoiceLine, InvoiceTotals};
use persistence::entities::OrderItemDetailEntity;
use persistence::repositories::OrderRepository;
use shared::crypto::sha256_hex;
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_invoice_rendered;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for the order history listing.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// One order in the history listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub is_paid: bool,
}

/// GET /orders payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub orders: Vec<OrderSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// GET /orders
///
/// The caller's orders, newest first, cursor-paginated.
pub async fn order_history(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let after = match params.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor).map_err(|e| ApiError::Validation(e.to_string()))?,
        ),
        None => None,
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let rows = OrderRepository::new(state.pool.clone())
        .list_for_user(auth.user_id, after, limit)
        .await?;

    let next_cursor = if rows.len() as i64 == limit {
        rows.last().map(|row| encode_cursor(row.created_at, row.id))
    } else {
        None
    };

    let orders = rows
        .into_iter()
        .map(|row| {
            let order: Order = row.into();
            OrderSummary {
                id: order.id,
                created_at: order.created_at,
                total_amount: order.total_amount,
                payment_method: order.payment_method.to_string(),
                is_paid: order.is_paid,
            }
        })
        .collect();

    Ok(Json(HistoryResponse {
        orders,
        next_cursor,
    }))
}

/// One invoice line in the JSON invoice view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub dish_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

/// Subtotal and tax breakdown of the invoice view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotalsView {
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub grand_total: Decimal,
}

/// GET /invoice/{order_id} payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub order: Order,
    pub items: Vec<InvoiceItem>,
    pub totals: InvoiceTotalsView,
}

fn to_invoice_lines(items: &[OrderItemDetailEntity]) -> Vec<InvoiceLine> {
    items
        .iter()
        .map(|item| InvoiceLine {
            name: item.dish_name.clone(),
            quantity: item.quantity,
            price: item.price,
        })
        .collect()
}

/// Loads an order owned by the caller together with its resolved items.
async fn load_owned_order(
    state: &AppState,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<(Order, Vec<OrderItemDetailEntity>), ApiError> {
    let orders = OrderRepository::new(state.pool.clone());

    let order = orders
        .find_for_user(order_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    let items = orders.items_with_dish_names(order_id).await?;
    Ok((order.into(), items))
}

/// GET /invoice/{order_id}
pub async fn invoice(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let (order, items) = load_owned_order(&state, order_id, auth.user_id).await?;

    let lines = to_invoice_lines(&items);
    let totals = InvoiceTotals::compute(&lines);

    let items = items
        .into_iter()
        .map(|item| InvoiceItem {
            dish_id: item.dish_id,
            name: item.dish_name,
            quantity: item.quantity,
            price: item.price,
            line_total: item.price * Decimal::from(item.quantity),
        })
        .collect();

    Ok(Json(InvoiceResponse {
        order,
        items,
        totals: InvoiceTotalsView {
            subtotal: totals.subtotal,
            cgst: totals.cgst,
            sgst: totals.sgst,
            grand_total: totals.grand_total,
        },
    }))
}

/// GET /invoice/{order_id}/pdf
///
/// Streams the rendered invoice. Renderer trouble degrades to 503 instead
/// of failing the request chain; the HTML invoice view stays available.
pub async fn invoice_pdf(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (order, items) = load_owned_order(&state, order_id, auth.user_id).await?;

    let restaurants = OrderRepository::new(state.pool.clone())
        .restaurants_for_order(order_id)
        .await?;
    let restaurant = match restaurants.as_slice() {
        [single] => single.clone().into(),
        _ => {
            return Err(ApiError::Internal(format!(
                "Order {} does not resolve to exactly one restaurant",
                order_id
            )))
        }
    };

    let lines = to_invoice_lines(&items);
    let pdf_bytes = render_pdf(&order, &lines, &restaurant).map_err(|err| {
        tracing::warn!(order_id = %order_id, error = %err, "Invoice PDF rendering failed");
        ApiError::ServiceUnavailable("Invoice PDF generation is currently unavailable".to_string())
    })?;
    record_invoice_rendered();

    let etag = format!("\"{}\"", sha256_hex(&pdf_bytes));
    let disposition = format!("attachment; filename=\"invoice-{}.pdf\"", order_id);

    let mut response = (StatusCode::OK, pdf_bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str, quantity: i32) -> OrderItemDetailEntity {
        OrderItemDetailEntity {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            dish_id: Uuid::new_v4(),
            dish_name: name.to_string(),
            quantity,
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_invoice_totals_for_fixture_order() {
        let items = vec![item("Paneer Tikka", "150.00", 2)];
        let totals = InvoiceTotals::compute(&to_invoice_lines(&items));
        assert_eq!(totals.subtotal, "300.00".parse::<Decimal>().unwrap());
        assert_eq!(totals.cgst, "7.50".parse::<Decimal>().unwrap());
        assert_eq!(totals.sgst, "7.50".parse::<Decimal>().unwrap());
        assert_eq!(totals.grand_total, "315.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_history_limit_clamped() {
        assert_eq!(5000i64.clamp(1, MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!((-3i64).clamp(1, MAX_PAGE_SIZE), 1);
    }

    #[test]
    fn test_history_response_omits_cursor_when_finished() {
        let response = HistoryResponse {
            orders: vec![],
            next_cursor: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("nextCursor"));
    }
}
