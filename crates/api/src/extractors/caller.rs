//! Caller resolution for restaurant-management routes.
//!
//! Resolves the request's [`Caller`] exactly once: platform admins from the
//! user row, staff from their restaurant profile. Everything else fails
//! closed with a redirect to the restaurant login, never leaking data.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use domain::models::Caller;
use persistence::repositories::{ProfileRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::UserAuth;

/// The resolved caller for a restaurant-side request.
#[derive(Debug, Clone, Copy)]
pub struct StaffCaller(pub Caller);

/// Rejection for [`StaffCaller`]: unauthenticated or profile-less callers
/// land on the restaurant login; infrastructure failures surface as API
/// errors.
#[derive(Debug)]
pub enum CallerRejection {
    RestaurantLogin,
    Internal(ApiError),
}

impl IntoResponse for CallerRejection {
    fn into_response(self) -> Response {
        match self {
            CallerRejection::RestaurantLogin => {
                Redirect::to("/restaurant/login").into_response()
            }
            CallerRejection::Internal(err) => err.into_response(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StaffCaller {
    type Rejection = CallerRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state)
            .await
            .map_err(|_| CallerRejection::RestaurantLogin)?;

        let users = UserRepository::new(state.pool.clone());
        let user = users
            .find_by_id(auth.user_id)
            .await
            .map_err(|e| CallerRejection::Internal(e.into()))?
            .ok_or(CallerRejection::RestaurantLogin)?;

        if user.is_admin {
            return Ok(StaffCaller(Caller::Admin { user_id: user.id }));
        }

        let profiles = ProfileRepository::new(state.pool.clone());
        let profile = profiles
            .find_by_user(user.id)
            .await
            .map_err(|e| CallerRejection::Internal(e.into()))?
            .ok_or(CallerRejection::RestaurantLogin)?;

        let profile: domain::models::RestaurantProfile = profile.into();
        Ok(StaffCaller(Caller::RestaurantStaff {
            user_id: user.id,
            restaurant_id: profile.restaurant_id,
            role: profile.role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_rejection_redirects_to_restaurant_login() {
        let response = CallerRejection::RestaurantLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/restaurant/login"
        );
    }

    #[test]
    fn test_rejection_internal_passes_through() {
        let response =
            CallerRejection::Internal(ApiError::Internal("db down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
