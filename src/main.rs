mod domain;
mod clients;

mod app_system;
mod auth;
mod config;
mod http;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod order_actor;
mod product_actor;
mod revenue_actor;
mod user_actor;

use tracing::{error, info};

use crate::app_system::{seed, setup_tracing, StoreSystem, SystemError};
use crate::auth::{AccessControl, Passwords, TokenAuthority};
use crate::config::Config;
use crate::http::{router, AppState};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = Config::load()?;
    setup_tracing(&config.log_level.0);

    info!(address = %config.server.address(), "Starting storefront");

    let system = StoreSystem::new(config.actors.buffer_size);
    let access = AccessControl::new(
        TokenAuthority::new(&config.auth.jwt_secret, config.auth.token_ttl_secs),
        Passwords::new(config.auth.bcrypt_cost),
        system.user_client.clone(),
    );

    if config.seed.enabled {
        let report = seed(&system, &config.seed, &access).await?;
        info!(admin_id = %report.admin.id, products = report.products_created, "Seeding complete");
        if let Some(token) = &report.admin_token {
            info!(token = %token, "Admin bearer token");
        }
    }

    let app = router(AppState::new(&system, access, config.catalog.page_limits()));

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    info!(address = %config.server.address(), "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    system.shutdown().await?;

    info!("Application stopped");
    Ok(())
}
