//! Delivery ETA route.

use axum::{extract::Query, extract::State, Json};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use persistence::repositories::RestaurantRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::EtaError;

/// Query parameters: restaurant id plus the customer's position.
#[derive(Debug, Default, Deserialize)]
pub struct EtaParams {
    pub restaurant: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Successful ETA payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EtaResponse {
    pub duration_text: String,
    pub duration_seconds: i64,
    pub restaurant: String,
}

/// GET /eta
///
/// Looks up the travel time from the customer to the restaurant. The
/// provider call has a bounded timeout and every provider failure maps to
/// a degraded JSON response, never a crash.
pub async fn eta_lookup(
    State(state): State<AppState>,
    Query(params): Query<EtaParams>,
) -> Result<Json<EtaResponse>, ApiError> {
    let (restaurant_id, lat, lng) = match (
        params.restaurant.as_deref().and_then(|v| Uuid::parse_str(v).ok()),
        params.lat.as_deref().and_then(|v| v.trim().parse::<f64>().ok()),
        params.lng.as_deref().and_then(|v| v.trim().parse::<f64>().ok()),
    ) {
        (Some(restaurant_id), Some(lat), Some(lng)) => (restaurant_id, lat, lng),
        _ => return Err(ApiError::Validation("Missing parameters".to_string())),
    };

    let restaurant = RestaurantRepository::new(state.pool.clone())
        .find_active(restaurant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".to_string()))?;

    let (Some(dest_lat), Some(dest_lng)) = (
        restaurant.latitude.as_ref().and_then(|d| d.to_f64()),
        restaurant.longitude.as_ref().and_then(|d| d.to_f64()),
    ) else {
        return Err(ApiError::Validation(
            "Restaurant location not set".to_string(),
        ));
    };

    let eta = state
        .eta
        .as_ref()
        .ok_or_else(|| ApiError::Validation("API key not configured".to_string()))?;

    let quote = eta
        .lookup((lat, lng), (dest_lat, dest_lng))
        .await
        .map_err(|err| match err {
            EtaError::ServiceError(_) => ApiError::Validation("API error".to_string()),
            EtaError::NoRoute => ApiError::Validation("No route".to_string()),
            _ => ApiError::ServiceUnavailable("ETA unavailable".to_string()),
        })?;

    Ok(Json(EtaResponse {
        duration_text: quote.duration_text,
        duration_seconds: quote.duration_seconds,
        restaurant: restaurant.name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse_failures_are_missing() {
        let params = EtaParams {
            restaurant: Some("not-a-uuid".to_string()),
            lat: Some("12.97".to_string()),
            lng: Some("77.59".to_string()),
        };
        let parsed = params
            .restaurant
            .as_deref()
            .and_then(|v| Uuid::parse_str(v).ok());
        assert!(parsed.is_none());
    }

    #[test]
    fn test_eta_response_serialization() {
        let response = EtaResponse {
            duration_text: "24 mins".to_string(),
            duration_seconds: 1440,
            restaurant: "Udupi Grand".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("duration_text"));
        assert!(json.contains("1440"));
    }
}
