use env_logger::Env;
use log::info;
use once_cell::sync::Lazy;

mod config;
mod error;
mod handlers;
mod models;
mod routes;

#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::handlers::health_handlers::STARTED_AT;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    Lazy::force(&STARTED_AT);

    info!("Starting Invitation Service");

    let config = Config::from_env();

    // Migrations run inside create_router, before anything is served
    let app = routes::create_router(&config).await?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Invitation service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Invitation service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
