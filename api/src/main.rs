use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::{bail, Context};
use tessera_api::app::{create_app, AppState};
use tessera_api::logging;
use tessera_core::services::{StaticCredentialVerifier, TokenService, TokenServiceConfig};
use tessera_infra::connect_session_store;
use tessera_shared::config::AppConfig;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    logging::init(&config.logging).context("Failed to initialize logging")?;

    info!(environment = %config.environment, "Starting Tessera API Server");

    if config.auth.jwt.is_using_default_secrets() {
        if config.environment.is_production() {
            bail!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must be set in production");
        }
        warn!("Using default JWT secrets; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET");
    }

    let store = connect_session_store(config.cache.as_ref())
        .await
        .context("Failed to connect to the session store")?;

    let token_service = TokenService::new(store, TokenServiceConfig::from(&config.auth.jwt))
        .context("Invalid token configuration")?;
    let credentials = Arc::new(StaticCredentialVerifier::from(&config.auth.login));

    let state = web::Data::new(AppState::new(token_service, credentials));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(state.clone()))
        .workers(config.server.workers)
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
