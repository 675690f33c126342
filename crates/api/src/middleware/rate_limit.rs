//! Rate limiting middleware.
//!
//! Provides per-session rate limiting for the JSON cart endpoints, which
//! are the only surface a page script can hammer.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

use crate::app::AppState;

/// Type alias for the rate limiter used per session.
type SessionRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests, keyed by the cart
/// session id.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<Uuid, Arc<SessionRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given session id.
    fn get_or_create_limiter(&self, session_id: Uuid) -> Arc<SessionRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(&session_id) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another request created it
        if let Some(limiter) = limiters.get(&session_id) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(100).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(session_id, limiter.clone());
        limiter
    }

    /// Check whether a request from the session should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds.
    pub fn check(&self, session_id: Uuid) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(session_id);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that applies rate limiting per cart session.
///
/// Requests without a session cookie pass through: they mint a fresh
/// session in the handler and cannot be attributed to a bucket yet.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let session_id = state
        .cookies
        .extract_session_id(req.headers());

    let session_id = match session_id {
        Some(id) => id,
        None => return next.run(req).await,
    };

    if let Some(ref rate_limiter) = state.rate_limiter {
        if let Err(retry_after) = rate_limiter.check(session_id) {
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limit_exceeded",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    response
        .headers_mut()
        .insert(header::RETRY_AFTER, retry_after.to_string().parse().unwrap());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let state = RateLimiterState::new(5);
        let session = Uuid::new_v4();
        for _ in 0..5 {
            assert!(state.check(session).is_ok());
        }
        assert!(state.check(session).is_err());
    }

    #[test]
    fn test_sessions_have_independent_buckets() {
        let state = RateLimiterState::new(1);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(state.check(a).is_ok());
        assert!(state.check(b).is_ok());
        assert!(state.check(a).is_err());
    }

    #[test]
    fn test_retry_after_at_least_one_second() {
        let state = RateLimiterState::new(1);
        let session = Uuid::new_v4();
        state.check(session).ok();
        let retry_after = state.check(session).unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn test_debug_does_not_panic() {
        let state = RateLimiterState::new(10);
        let rendered = format!("{:?}", state);
        assert!(rendered.contains("rate_limit_per_minute"));
    }
}
