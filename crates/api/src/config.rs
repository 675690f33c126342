use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// JWT authentication configuration
    pub jwt: JwtAuthConfig,
    /// Auth and cart-session cookie configuration
    #[serde(default)]
    pub cookies: CookieConfig,
    /// Email service configuration
    #[serde(default)]
    pub email: EmailConfig,
    /// Distance/ETA provider configuration
    #[serde(default)]
    pub eta: EtaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-session rate limit on the JSON cart endpoints; 0 disables.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing tokens
    pub private_key: String,

    /// RSA public key in PEM format for verifying tokens
    pub public_key: String,

    /// Access token expiration in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Refresh token expiration in seconds (default: 2592000 = 30 days)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

/// Cookie attributes for the auth token pair and the cart session id.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    /// Whether auth tokens are mirrored into httpOnly cookies
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Add the Secure flag (disable only for local development)
    #[serde(default = "default_true")]
    pub secure: bool,

    /// SameSite attribute: Strict, Lax, or None
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Cookie Domain attribute; empty means host-only
    #[serde(default)]
    pub domain: String,

    #[serde(default = "default_access_token_name")]
    pub access_token_name: String,

    #[serde(default = "default_refresh_token_name")]
    pub refresh_token_name: String,

    /// Name of the anonymous cart session cookie
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,

    /// Max-Age of the cart session cookie in seconds (default: 14 days)
    #[serde(default = "default_session_cookie_max_age")]
    pub session_cookie_max_age_secs: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secure: true,
            same_site: default_same_site(),
            domain: String::new(),
            access_token_name: default_access_token_name(),
            refresh_token_name: default_refresh_token_name(),
            session_cookie_name: default_session_cookie_name(),
            session_cookie_max_age_secs: default_session_cookie_max_age(),
        }
    }
}

/// Email service configuration for sending invoice emails.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: smtp, sendgrid, or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// SMTP server host (for smtp provider)
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP server port (for smtp provider)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            sendgrid_api_key: String::new(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
        }
    }
}

/// Distance-matrix provider configuration for delivery ETA lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct EtaConfig {
    /// Provider API key; empty disables the feature
    #[serde(default)]
    pub api_key: String,

    /// Distance-matrix endpoint
    #[serde(default = "default_eta_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; the lookup is on the request path and
    /// must stay bounded
    #[serde(default = "default_eta_timeout")]
    pub timeout_secs: u64,
}

impl Default for EtaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_eta_base_url(),
            timeout_secs: default_eta_timeout(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_access_token_expiry() -> i64 {
    3600
}
fn default_refresh_token_expiry() -> i64 {
    2592000
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_same_site() -> String {
    "Lax".to_string()
}
fn default_access_token_name() -> String {
    "access_token".to_string()
}
fn default_refresh_token_name() -> String {
    "refresh_token".to_string()
}
fn default_session_cookie_name() -> String {
    "fb_session".to_string()
}
fn default_session_cookie_max_age() -> i64 {
    1_209_600 // 14 days
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_sender_email() -> String {
    "noreply@foodbooking.app".to_string()
}
fn default_sender_name() -> String {
    "FoodBooking".to_string()
}
fn default_eta_base_url() -> String {
    "https://maps.googleapis.com/maps/api/distancematrix/json".to_string()
}
fn default_eta_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with FB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("FB").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration for testing with custom overrides, without
    /// touching the filesystem.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 100

            [jwt]
            private_key = "test-private-key"
            public_key = "test-public-key"
            access_token_expiry_secs = 3600
            refresh_token_expiry_secs = 2592000
            leeway_secs = 30

            [cookies]
            enabled = true
            secure = false
            same_site = "Lax"

            [email]
            enabled = false
            provider = "console"
            sender_email = "test@example.com"
            sender_name = "Test"

            [eta]
            api_key = ""
            timeout_secs = 5
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// The socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid server host/port configuration")
    }

    /// The persistence-layer view of the database settings.
    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_for_test_defaults() {
        let config = Config::load_for_test(&[]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.rate_limit_per_minute, 100);
        assert_eq!(config.cookies.session_cookie_name, "fb_session");
        assert_eq!(config.eta.timeout_secs, 5);
        assert!(!config.email.enabled);
    }

    #[test]
    fn test_load_for_test_overrides() {
        let config = Config::load_for_test(&[
            ("server.port", "9999"),
            ("security.rate_limit_per_minute", "0"),
            ("eta.api_key", "test-key"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.security.rate_limit_per_minute, 0);
        assert_eq!(config.eta.api_key, "test-key");
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[("server.host", "127.0.0.1")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_email_config() {
        let email = EmailConfig::default();
        assert!(!email.enabled);
        assert_eq!(email.provider, "console");
        assert_eq!(email.smtp_port, 587);
    }

    #[test]
    fn test_default_eta_config() {
        let eta = EtaConfig::default();
        assert!(eta.api_key.is_empty());
        assert!(eta.base_url.contains("distancematrix"));
    }
}
