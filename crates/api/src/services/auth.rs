//! Registration and login flows.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;
use shared::password::{hash_password, verify_password};

/// Errors surfaced by registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username and password are required.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Username already exists.")]
    UsernameTaken,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The token pair handed to a freshly authenticated user.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: domain::models::User,
    pub tokens: AuthTokens,
}

/// Registration and login service.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    /// Create the service over a pool and a prebuilt JWT config.
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Register a new account and log it in.
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        confirm: &str,
    ) -> Result<AuthSession, AuthError> {
        let username = username.trim();
        let password = password.trim();
        let email = email.map(str::trim).filter(|e| !e.is_empty());

        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password != confirm.trim() {
            return Err(AuthError::PasswordMismatch);
        }
        if self.users.username_exists(username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash =
            hash_password(password).map_err(|e| AuthError::Password(e.to_string()))?;
        let user = self
            .users
            .create_user(username, email, &password_hash)
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        let tokens = self.issue_tokens(user.id)?;
        Ok(AuthSession {
            user: user.into(),
            tokens,
        })
    }

    /// Log in with a username or an email address.
    ///
    /// An identifier containing `@` is first resolved through the email
    /// column; if nothing matches it is still tried as a literal username.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, AuthError> {
        let identifier = identifier.trim();
        let password = password.trim();

        let user = if identifier.contains('@') {
            match self.users.find_by_email(identifier).await? {
                Some(user) => Some(user),
                None => self.users.find_by_username(identifier).await?,
            }
        } else {
            self.users.find_by_username(identifier).await?
        };

        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Password(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");

        let tokens = self.issue_tokens(user.id)?;
        Ok(AuthSession {
            user: user.into(),
            tokens,
        })
    }

    fn issue_tokens(&self, user_id: uuid::Uuid) -> Result<AuthTokens, AuthError> {
        let (access_token, _) = self
            .jwt
            .generate_access_token(user_id)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        let (refresh_token, _) = self
            .jwt
            .generate_refresh_token(user_id)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}
