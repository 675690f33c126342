//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user account database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email, case-insensitive. When the same address is
    /// attached to several accounts the oldest one wins, so that login by
    /// email stays deterministic.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a username is already taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("username_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new user account.
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash, is_admin)
            VALUES ($1, $2, $3, false)
            RETURNING id, username, email, password_hash, is_admin, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
