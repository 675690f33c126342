//! Authentication routes for registration, login, and logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService, AuthSession};

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Optional email address, used for invoice delivery
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Password confirmation, must match
    pub confirm: String,
}

/// Request body for login. The identifier may be a username or an email
/// address.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User information in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// Token information in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

pub(crate) fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::MissingFields | AuthError::PasswordMismatch => {
            ApiError::Validation(err.to_string())
        }
        AuthError::UsernameTaken => ApiError::Conflict(err.to_string()),
        AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        AuthError::Password(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::Token(e) => ApiError::Internal(format!("Token error: {}", e)),
        AuthError::Database(db_err) => ApiError::from(db_err),
    }
}

pub(crate) fn auth_response(state: &AppState, session: AuthSession, status: StatusCode) -> Response {
    let body = AuthResponse {
        user: UserResponse {
            id: session.user.id.to_string(),
            username: session.user.username,
            email: session.user.email,
            is_admin: session.user.is_admin,
        },
        tokens: TokensResponse {
            access_token: session.tokens.access_token.clone(),
            refresh_token: session.tokens.refresh_token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: session.tokens.expires_in,
        },
    };

    let mut response = (status, Json(body)).into_response();
    state.cookies.add_token_cookies(
        response.headers_mut(),
        &session.tokens.access_token,
        &session.tokens.refresh_token,
    );
    response
}

/// POST /register
///
/// Registers a new account and logs it in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let session = service
        .register(
            &request.username,
            request.email.as_deref(),
            &request.password,
            &request.confirm,
        )
        .await
        .map_err(map_auth_error)?;

    Ok(auth_response(&state, session, StatusCode::CREATED))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let session = service
        .login(&request.username, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(auth_response(&state, session, StatusCode::OK))
}

/// POST /logout
///
/// Clears the auth cookies; the stateless tokens simply age out.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    state.cookies.add_clear_cookies(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "asha".to_string(),
            email: Some("asha@example.com".to_string()),
            password: "secret123".to_string(),
            confirm: "secret123".to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let mut request = register_request();
        request.email = Some("not-an-email".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_email_optional() {
        let mut request = register_request();
        request.email = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_empty_username() {
        let mut request = register_request();
        request.username = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_fields() {
        let request = LoginRequest {
            username: String::new(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_map_auth_error_statuses() {
        let conflict = map_auth_error(AuthError::UsernameTaken).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let unauthorized = map_auth_error(AuthError::InvalidCredentials).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let validation = map_auth_error(AuthError::PasswordMismatch).into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
    }
}
