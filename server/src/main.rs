//! Fleet Server binary.

use fleet_server::config::Config;
use fleet_server::{app, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Fleet Server on {}:{}", config.host, config.port);

    let state = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            AppState::postgres(pool, config.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            AppState::in_memory(config.clone())
        }
    };

    if config.enable_reset {
        tracing::warn!("Reset endpoint GET /sync is enabled");
    }

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
