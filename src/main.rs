use std::time::Duration;

use tokio::net::TcpListener;

use anyhow::anyhow;

use voxrelay::core::artifacts::store::run_sweeper;
use voxrelay::{ServerConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;
    let address = config.address();
    println!("Starting server on {address}");

    // Create application state
    let app_state = AppState::new(config)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;

    // Reclaim aged audio artifacts in the background
    tokio::spawn(run_sweeper(
        app_state.artifacts.clone(),
        Duration::from_secs(app_state.config.cleanup_interval_secs),
        Duration::from_secs(app_state.config.max_file_age_secs),
    ));

    let app = routes::api::create_api_router().with_state(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    println!("Server listening on {address}");

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
