use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::ConnectionProvider;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // A missing .env file is fine; variables may come from the environment
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        url = %config.mongodb.redacted_url(),
        database = %config.mongodb.database(),
        mode = %config.mongodb.mode,
        "Configuring MongoDB access"
    );

    let provider = ConnectionProvider::from_config(config.mongodb.clone(), None).await?;

    let state = AppState { config, provider };

    let api_routes = api::routes(&state);

    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    let app = router.merge(health_router(state.config.app));

    info!("Starting Users API with graceful shutdown (30s timeout)");

    let provider = state.provider.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            provider.close().await;
            info!("MongoDB connections released");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
