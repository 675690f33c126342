//! Cookie helper for httpOnly auth tokens and the cart session id.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use uuid::Uuid;

use crate::config::CookieConfig;

/// Builds, reads, and clears the cookies this service uses: the JWT pair
/// for authenticated users and the anonymous cart session id.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl CookieHelper {
    /// Create a new cookie helper with configuration.
    pub fn new(
        config: CookieConfig,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Self {
        Self {
            config,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Whether auth cookies are enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Add the auth token cookies to a response HeaderMap.
    pub fn add_token_cookies(
        &self,
        headers: &mut HeaderMap,
        access_token: &str,
        refresh_token: &str,
    ) {
        if !self.config.enabled {
            return;
        }

        let access = self.build_cookie(
            &self.config.access_token_name,
            access_token,
            self.access_token_expiry_secs,
        );
        let refresh = self.build_cookie(
            &self.config.refresh_token_name,
            refresh_token,
            self.refresh_token_expiry_secs,
        );

        if let Ok(value) = HeaderValue::from_str(&access) {
            headers.append(SET_COOKIE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&refresh) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Add clear-cookies to a response HeaderMap (logout).
    pub fn add_clear_cookies(&self, headers: &mut HeaderMap) {
        if !self.config.enabled {
            return;
        }

        for name in [
            self.config.access_token_name.as_str(),
            self.config.refresh_token_name.as_str(),
        ] {
            if let Ok(value) = HeaderValue::from_str(&self.build_clear_cookie(name)) {
                headers.append(SET_COOKIE, value);
            }
        }
    }

    /// Add the cart session cookie to a response HeaderMap.
    pub fn add_session_cookie(&self, headers: &mut HeaderMap, session_id: Uuid) {
        let cookie = self.build_cookie(
            &self.config.session_cookie_name,
            &session_id.to_string(),
            self.config.session_cookie_max_age_secs,
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Extract a cookie value from request headers by name.
    pub fn extract_cookie<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get(axum::http::header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|cookie_header| {
                cookie_header
                    .split(';')
                    .map(|s| s.trim())
                    .find_map(|cookie| {
                        let (cookie_name, cookie_value) = cookie.split_once('=')?;
                        if cookie_name == name {
                            Some(cookie_value)
                        } else {
                            None
                        }
                    })
            })
    }

    /// Extract the access token from request headers.
    pub fn extract_access_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        self.extract_cookie(headers, &self.config.access_token_name)
    }

    /// Extract the cart session id from request headers, if present and
    /// well-formed.
    pub fn extract_session_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        self.extract_cookie(headers, &self.config.session_cookie_name)
            .and_then(|value| Uuid::parse_str(value).ok())
    }

    fn build_cookie(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age);

        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }

    fn build_clear_cookie(&self, name: &str) -> String {
        let mut cookie = format!(
            "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            name
        );

        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }

        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CookieConfig {
        CookieConfig {
            enabled: true,
            secure: true,
            same_site: "Lax".to_string(),
            domain: String::new(),
            access_token_name: "access_token".to_string(),
            refresh_token_name: "refresh_token".to_string(),
            session_cookie_name: "fb_session".to_string(),
            session_cookie_max_age_secs: 1_209_600,
        }
    }

    fn helper() -> CookieHelper {
        CookieHelper::new(test_config(), 3600, 2592000)
    }

    #[test]
    fn test_token_cookies_have_security_attributes() {
        let mut headers = HeaderMap::new();
        helper().add_token_cookies(&mut headers, "acc", "ref");

        let cookies: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].contains("access_token=acc"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("Secure"));
        assert!(cookies[0].contains("SameSite=Lax"));
        assert!(cookies[1].contains("refresh_token=ref"));
    }

    #[test]
    fn test_clear_cookies_expire_in_the_past() {
        let mut headers = HeaderMap::new();
        helper().add_clear_cookies(&mut headers);

        for value in headers.get_all(SET_COOKIE) {
            let cookie = value.to_str().unwrap();
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("Expires=Thu, 01 Jan 1970"));
        }
    }

    #[test]
    fn test_session_cookie_round_trip() {
        let helper = helper();
        let session_id = Uuid::new_v4();

        let mut response_headers = HeaderMap::new();
        helper.add_session_cookie(&mut response_headers, session_id);
        let set_cookie = response_headers
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let pair = set_cookie.split(';').next().unwrap();
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_str(pair).unwrap(),
        );
        assert_eq!(helper.extract_session_id(&request_headers), Some(session_id));
    }

    #[test]
    fn test_extract_session_id_rejects_garbage() {
        let helper = helper();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("fb_session=not-a-uuid"),
        );
        assert_eq!(helper.extract_session_id(&headers), None);
    }

    #[test]
    fn test_extract_cookie_among_many() {
        let helper = helper();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("access_token=abc123; other=value; refresh_token=xyz789"),
        );
        assert_eq!(helper.extract_access_token(&headers), Some("abc123"));
        assert_eq!(
            helper.extract_cookie(&headers, "refresh_token"),
            Some("xyz789")
        );
        assert_eq!(helper.extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_disabled_helper_sets_no_auth_cookies() {
        let mut config = test_config();
        config.enabled = false;
        let helper = CookieHelper::new(config, 3600, 2592000);

        let mut headers = HeaderMap::new();
        helper.add_token_cookies(&mut headers, "a", "r");
        assert!(headers.get(SET_COOKIE).is_none());
    }
}
