use anyhow::Result;
use tracing::info;

mod app;
mod config;
mod error;
mod extractors;
mod middleware;
mod routes;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting FoodBooking API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/migrations").run(&pool).await?;
    info!("Migrations completed");

    // Build application
    let addr = config.socket_addr();
    let app = app::create_app(config, pool)?;

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
