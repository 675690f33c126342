use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{auth, cart, catalog, checkout, eta, health, help, orders, restaurant};
use crate::services::{CookieHelper, EmailService, EtaService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieHelper,
    pub email: EmailService,
    pub eta: Option<Arc<EtaService>>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let jwt = Arc::new(
        JwtConfig::with_leeway(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )
        .map_err(|e| anyhow::anyhow!("Invalid JWT key configuration: {}", e))?,
    );

    let cookies = CookieHelper::new(
        config.cookies.clone(),
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
    );

    let email = EmailService::new(config.email.clone());
    let eta_service = EtaService::from_config(&config.eta).map(Arc::new);

    // Rate limiter only when enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        cookies,
        email,
        eta: eta_service,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public catalog and probe routes
    let public_routes = Router::new()
        .route("/", get(catalog::home))
        .route("/app", get(catalog::app_home))
        .route("/eta", get(eta::eta_lookup))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Account routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/restaurant/login", post(restaurant::restaurant_login));

    // Cart routes, rate-limited per session
    let cart_routes = Router::new()
        .route("/cart", get(cart::view_cart))
        .route("/cart/add/:dish_id", post(cart::add_to_cart))
        .route("/cart/add/:dish_id/json", post(cart::add_to_cart_json))
        .route("/cart/update/:dish_id", post(cart::update_cart))
        .route("/cart/update/:dish_id/json", post(cart::update_cart_json))
        .route("/cart/remove/:dish_id", post(cart::remove_from_cart))
        .route("/cart/clear", post(cart::clear_cart))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Authenticated customer routes
    let customer_routes = Router::new()
        .route(
            "/checkout",
            get(checkout::checkout_preview).post(checkout::checkout),
        )
        .route("/orders", get(orders::order_history))
        .route("/invoice/:order_id", get(orders::invoice))
        .route("/invoice/:order_id/pdf", get(orders::invoice_pdf))
        .route("/help", get(help::list_tickets).post(help::create_ticket))
        .route("/help/:ticket_id/status", post(help::update_ticket_status));

    // Restaurant staff routes (caller resolution happens in extractors)
    let staff_routes = Router::new()
        .route("/restaurant", get(restaurant::dashboard))
        .route("/restaurant/dishes", get(restaurant::list_dishes))
        .route("/restaurant/dishes/add", post(restaurant::add_dishes))
        .route(
            "/restaurant/dishes/:dish_id",
            put(restaurant::update_dish).delete(restaurant::delete_dish),
        );

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(cart_routes)
        .merge(customer_routes)
        .merge(staff_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
