//! Restaurant staff routes: login, dashboard, and menu management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{DateTime, Duration, Local, LocalResult, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use domain::models::{Caller, Category, DashboardMetrics, Dish};
use persistence::repositories::{
    CategoryRepository, DashboardRepository, DishRepository, NewDish, ProfileRepository,
    UpdateDish,
};
use shared::validation::{validate_price, validate_rating};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::StaffCaller;
use crate::routes::auth::{auth_response, map_auth_error, LoginRequest};
use crate::services::AuthService;

/// POST /restaurant/login
///
/// Same credential check as the customer login, but the account must carry
/// a restaurant profile; anyone else is turned away before a session is
/// issued.
pub async fn restaurant_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let session = service
        .login(&request.username, &request.password)
        .await
        .map_err(map_auth_error)?;

    let profile = ProfileRepository::new(state.pool.clone())
        .find_by_user(session.user.id)
        .await?;

    if profile.is_none() && !session.user.is_admin {
        return Err(ApiError::Forbidden(
            "No restaurant access for this user.".to_string(),
        ));
    }

    Ok(auth_response(&state, session, StatusCode::OK))
}

/// Optional explicit restaurant scope, honored for admins only.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeParams {
    pub restaurant: Option<Uuid>,
}

/// Resolves which restaurant the caller operates on. Staff are pinned to
/// their own restaurant regardless of what the request asks for; admins
/// must name one explicitly.
fn resolve_scope(caller: &Caller, params: &ScopeParams) -> Result<Uuid, ApiError> {
    match caller.restaurant_scope() {
        Some(own) => Ok(own),
        None => params.restaurant.ok_or_else(|| {
            ApiError::Validation("Admin callers must pass ?restaurant=<id>".to_string())
        }),
    }
}

/// UTC bounds of the current local calendar date.
fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    let start = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // A DST gap at midnight: fall back to the current instant's day
        LocalResult::None => Local::now(),
    };
    let start = start.with_timezone(&Utc);
    (start, start + Duration::days(1))
}

/// GET /restaurant payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub restaurant_id: Uuid,
    pub metrics: DashboardMetrics,
    pub dishes: Vec<Dish>,
}

/// GET /restaurant
///
/// Today's sales rollup plus the full menu for the caller's restaurant.
pub async fn dashboard(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Query(params): Query<ScopeParams>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let restaurant_id = resolve_scope(&caller, &params)?;
    let (day_start, day_end) = local_day_bounds();

    let metrics = DashboardRepository::new(state.pool.clone())
        .metrics(restaurant_id, day_start, day_end)
        .await?;

    let dishes = DishRepository::new(state.pool.clone())
        .list_for_restaurant(restaurant_id)
        .await?;

    Ok(Json(DashboardResponse {
        restaurant_id,
        metrics,
        dishes: dishes.into_iter().map(Into::into).collect(),
    }))
}

/// GET /restaurant/dishes payload. Categories ride along so management
/// forms can offer only valid selections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishListResponse {
    pub restaurant_id: Uuid,
    pub dishes: Vec<Dish>,
    pub categories: Vec<Category>,
}

/// GET /restaurant/dishes
pub async fn list_dishes(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Query(params): Query<ScopeParams>,
) -> Result<Json<DishListResponse>, ApiError> {
    let restaurant_id = resolve_scope(&caller, &params)?;

    let dishes = DishRepository::new(state.pool.clone())
        .list_for_restaurant(restaurant_id)
        .await?;
    let categories = CategoryRepository::new(state.pool.clone())
        .list_all()
        .await?;

    Ok(Json(DishListResponse {
        restaurant_id,
        dishes: dishes.into_iter().map(Into::into).collect(),
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

/// One dish in the batch add request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_veg: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub category_id: Option<Uuid>,
    pub rating: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

/// POST /restaurant/dishes/add body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDishesRequest {
    pub dishes: Vec<DishForm>,
}

/// POST /restaurant/dishes/add payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDishesResponse {
    pub created: usize,
    pub dishes: Vec<Dish>,
}

fn validate_dish_form(form: &DishForm) -> Result<(), ApiError> {
    if form.name.trim().is_empty() {
        return Err(ApiError::Validation("Dish name is required".to_string()));
    }
    validate_price(&form.price).map_err(|e| ApiError::Validation(e.to_string()))?;
    if let Some(rating) = &form.rating {
        validate_rating(rating).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    Ok(())
}

/// POST /restaurant/dishes/add
///
/// Batch-creates dishes on the caller's menu. The whole batch is validated
/// before anything is written; an empty batch is rejected rather than
/// silently succeeding.
pub async fn add_dishes(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Query(params): Query<ScopeParams>,
    Json(request): Json<AddDishesRequest>,
) -> Result<(StatusCode, Json<AddDishesResponse>), ApiError> {
    let restaurant_id = resolve_scope(&caller, &params)?;

    if request.dishes.is_empty() {
        return Err(ApiError::Validation("No dishes were added.".to_string()));
    }
    for form in &request.dishes {
        validate_dish_form(form)?;
    }

    let repo = DishRepository::new(state.pool.clone());
    let mut created = Vec::with_capacity(request.dishes.len());
    for form in request.dishes {
        let dish = repo
            .create(
                restaurant_id,
                &NewDish {
                    category_id: form.category_id,
                    name: form.name.trim().to_string(),
                    description: form.description,
                    price: form.price,
                    is_veg: form.is_veg,
                    is_available: form.is_available,
                    rating: form.rating.unwrap_or_else(|| Decimal::new(40, 1)),
                },
            )
            .await?;
        created.push(dish);
    }

    info!(
        restaurant_id = %restaurant_id,
        staff_user = %caller.user_id(),
        created = created.len(),
        "Dishes added"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddDishesResponse {
            created: created.len(),
            dishes: created.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// Distinguishes an absent field from an explicit null: absent leaves the
/// outer Option at None, null arrives as Some(None).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// PUT /restaurant/dishes/{dish_id} body. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishRequest {
    /// Double option: absent = keep, null = clear the category
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_veg: Option<bool>,
    pub is_available: Option<bool>,
    pub rating: Option<Decimal>,
}

/// PUT /restaurant/dishes/{dish_id}
pub async fn update_dish(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Path(dish_id): Path<Uuid>,
    Query(params): Query<ScopeParams>,
    Json(request): Json<UpdateDishRequest>,
) -> Result<Json<Dish>, ApiError> {
    let restaurant_id = resolve_scope(&caller, &params)?;

    if let Some(price) = &request.price {
        validate_price(price).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(rating) = &request.rating {
        validate_rating(rating).map_err(|e| ApiError::Validation(e.to_string()))?;
    }

    let changes = UpdateDish {
        category_id: request.category_id,
        name: request.name,
        description: request.description,
        price: request.price,
        is_veg: request.is_veg,
        is_available: request.is_available,
        rating: request.rating,
    };

    let dish = DishRepository::new(state.pool.clone())
        .update(dish_id, restaurant_id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dish not found".to_string()))?;

    Ok(Json(dish.into()))
}

/// DELETE /restaurant/dishes/{dish_id}
pub async fn delete_dish(
    State(state): State<AppState>,
    StaffCaller(caller): StaffCaller,
    Path(dish_id): Path<Uuid>,
    Query(params): Query<ScopeParams>,
) -> Result<StatusCode, ApiError> {
    let restaurant_id = resolve_scope(&caller, &params)?;

    let deleted = DishRepository::new(state.pool.clone())
        .delete(dish_id, restaurant_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Dish not found".to_string()));
    }

    info!(
        dish_id = %dish_id,
        restaurant_id = %restaurant_id,
        staff_user = %caller.user_id(),
        "Dish deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::StaffRole;

    #[test]
    fn test_staff_scope_ignores_query_param() {
        let own = Uuid::new_v4();
        let caller = Caller::RestaurantStaff {
            user_id: Uuid::new_v4(),
            restaurant_id: own,
            role: StaffRole::Owner,
        };
        let params = ScopeParams {
            restaurant: Some(Uuid::new_v4()),
        };
        assert_eq!(resolve_scope(&caller, &params).unwrap(), own);
    }

    #[test]
    fn test_admin_scope_requires_param() {
        let caller = Caller::Admin {
            user_id: Uuid::new_v4(),
        };
        assert!(resolve_scope(&caller, &ScopeParams::default()).is_err());

        let target = Uuid::new_v4();
        let params = ScopeParams {
            restaurant: Some(target),
        };
        assert_eq!(resolve_scope(&caller, &params).unwrap(), target);
    }

    #[test]
    fn test_local_day_bounds_cover_24_hours() {
        let (start, end) = local_day_bounds();
        assert_eq!(end - start, Duration::days(1));
        let now = Utc::now();
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_dish_form_validation() {
        let form = DishForm {
            name: "Masala Dosa".to_string(),
            description: String::new(),
            price: "120.00".parse().unwrap(),
            is_veg: true,
            is_available: true,
            category_id: None,
            rating: Some("4.5".parse().unwrap()),
        };
        assert!(validate_dish_form(&form).is_ok());

        let mut bad_name = form.clone();
        bad_name.name = "  ".to_string();
        assert!(validate_dish_form(&bad_name).is_err());

        let mut bad_price = form.clone();
        bad_price.price = "-5.00".parse().unwrap();
        assert!(validate_dish_form(&bad_price).is_err());

        let mut bad_rating = form;
        bad_rating.rating = Some("9.9".parse().unwrap());
        assert!(validate_dish_form(&bad_rating).is_err());
    }
}
