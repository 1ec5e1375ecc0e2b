use axum::Router;
use std::net::SocketAddr;
use tracing::{error, info};

mod api;
mod config;
mod models;
mod services;
mod storage;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Make sure the local demo dataset exists before a Local session asks for it
    if !std::path::Path::new(&config.database.local_path).exists() {
        info!(
            "Seeding student database at {}",
            config.database.local_path
        );
        storage::seed_student_db(&config.database.local_path).map_err(|e| {
            error!("Failed to seed student database: {}", e);
            e
        })?;
    }

    info!("Starting server on {}", config.server_address());

    let app: Router = api::routes::create_router_with_state(config.clone());

    let addr: SocketAddr = config.server_address().parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
