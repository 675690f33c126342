//! User JWT authentication extractor.
//!
//! Validates the Bearer token from the Authorization header, falling back
//! to the httpOnly access-token cookie for browser flows.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use shared::jwt::extract_user_id;

/// Authenticated user information from a validated JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for log correlation.
    pub jti: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| state.cookies.extract_access_token(&parts.headers))
            .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_string()))?;

        let claims = state
            .jwt
            .validate_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
        })
    }
}

/// Optional user authentication.
///
/// Lets routes attach user context without rejecting anonymous requests.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUserAuth(
            UserAuth::from_request_parts(parts, state).await.ok(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_struct() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        assert!(!auth.jti.is_empty());
    }

    #[test]
    fn test_optional_user_auth_none() {
        let auth = OptionalUserAuth(None);
        assert!(auth.0.is_none());
    }

    #[test]
    fn test_optional_user_auth_clone() {
        let auth = OptionalUserAuth(Some(UserAuth {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        }));
        let cloned = auth.clone();
        assert!(cloned.0.is_some());
    }
}
