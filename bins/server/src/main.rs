//! Lyvinx API Server
//!
//! Main entry point for the Lyvinx personal finance service.

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyvinx_api::{AppState, create_router};
use lyvinx_db::{RefreshTokenRepository, connect};
use lyvinx_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyvinx=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    match RefreshTokenRepository::new(db.clone()).cleanup_expired().await {
        Ok(removed) => info!(removed, "Expired refresh tokens removed"),
        Err(e) => warn!(error = %e, "Could not clean up expired refresh tokens"),
    }

    let addr = config.bind_address();
    let state = AppState::new(db, config);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
