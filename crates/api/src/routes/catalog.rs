//! Public catalog routes: landing page and the filtered dish listing.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::{group_by_category, CatalogDish, CategoryGroup, DishFilter, Restaurant};
use persistence::repositories::{CartRepository, DishRepository, RestaurantRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CartSession;

/// Landing page payload: the active restaurants.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub restaurants: Vec<Restaurant>,
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, ApiError> {
    let restaurants = RestaurantRepository::new(state.pool.clone())
        .list_active()
        .await?;

    Ok(Json(HomeResponse {
        restaurants: restaurants.into_iter().map(Into::into).collect(),
    }))
}

/// Raw catalog query parameters; every filter is optional and tolerant of
/// malformed values.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub veg: Option<String>,
    pub sort: Option<String>,
    pub min_rating: Option<String>,
    pub price: Option<String>,
    pub restaurant: Option<String>,
}

/// Echo of the filters as applied, for the client to render its controls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub query: Option<String>,
    pub veg: Option<String>,
    pub sort: Option<String>,
    pub min_rating: Option<String>,
    pub price: Option<String>,
}

/// Catalog listing payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub dishes: Vec<CatalogDish>,
    /// Present only when scoped to one restaurant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped: Option<Vec<CategoryGroup>>,
    pub filters: AppliedFilters,
    pub restaurants: Vec<Restaurant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_restaurant: Option<Uuid>,
    pub cart_count: u32,
}

/// GET /app
///
/// The filtered catalog. When scoped to one restaurant the dishes are
/// additionally grouped by category, uncategorized dishes trailing.
pub async fn app_home(
    State(state): State<AppState>,
    session: CartSession,
    Query(params): Query<CatalogParams>,
) -> Result<Response, ApiError> {
    let filter = DishFilter::from_params(
        params.q.as_deref(),
        params.veg.as_deref(),
        params.sort.as_deref(),
        params.min_rating.as_deref(),
        params.price.as_deref(),
        params.restaurant.as_deref(),
    );

    let dishes: Vec<CatalogDish> = DishRepository::new(state.pool.clone())
        .search(&filter)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let grouped = filter
        .restaurant_id
        .map(|_| group_by_category(dishes.clone()));

    let restaurants = RestaurantRepository::new(state.pool.clone())
        .list_active()
        .await?;

    let cart = CartRepository::new(state.pool.clone())
        .load(session.id)
        .await?;

    let body = CatalogResponse {
        dishes,
        grouped,
        filters: AppliedFilters {
            query: filter.query.clone(),
            veg: params.veg.filter(|v| v == "veg" || v == "nonveg"),
            sort: params.sort,
            min_rating: params.min_rating,
            price: params.price,
        },
        restaurants: restaurants.into_iter().map(Into::into).collect(),
        selected_restaurant: filter.restaurant_id,
        cart_count: cart.count(),
    };

    let mut response = Json(body).into_response();
    session.write_cookie(&state.cookies, response.headers_mut());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_params_all_optional() {
        let params: CatalogParams = serde_json::from_str("{}").unwrap();
        assert!(params.q.is_none());
        assert!(params.veg.is_none());
    }

    #[test]
    fn test_applied_filters_drop_unknown_veg_marker() {
        let veg = Some("carnivore".to_string()).filter(|v| v == "veg" || v == "nonveg");
        assert!(veg.is_none());
        let veg = Some("veg".to_string()).filter(|v| v == "veg" || v == "nonveg");
        assert_eq!(veg.as_deref(), Some("veg"));
    }
}
