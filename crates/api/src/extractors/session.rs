//! Cart session extractor.
//!
//! The cart is keyed by an anonymous session UUID carried in an httpOnly
//! cookie, independent of login state so browsing works before signup.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;
use uuid::Uuid;

use crate::app::AppState;
use crate::services::CookieHelper;

/// The request's cart session: the cookie's UUID, or a freshly minted one
/// when the cookie is absent or malformed.
#[derive(Debug, Clone, Copy)]
pub struct CartSession {
    pub id: Uuid,
    /// True when this request minted a new session id; the handler must
    /// write the cookie back so the session sticks.
    pub minted: bool,
}

impl CartSession {
    /// Write the session cookie onto a response. Always refreshes the
    /// cookie so active carts never expire mid-browse.
    pub fn write_cookie(&self, cookies: &CookieHelper, headers: &mut HeaderMap) {
        cookies.add_session_cookie(headers, self.id);
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CartSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.cookies.extract_session_id(&parts.headers) {
            Some(id) => Ok(CartSession { id, minted: false }),
            None => Ok(CartSession {
                id: Uuid::new_v4(),
                minted: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_flag() {
        let fresh = CartSession {
            id: Uuid::new_v4(),
            minted: true,
        };
        assert!(fresh.minted);
    }
}
