//! Coffee Shop application composition root
//!
//! Composes the authorization gate and the domain routers into a single
//! application.

use std::sync::Arc;

use axum::{routing::get, Router};
use coffeeshop_auth::{AuthConfig, AuthGate};
use coffeeshop_common::Config;
use coffeeshop_drinks::{DrinkRepository, DrinksState, InMemoryDrinkRepository};

/// Create the main application router from process configuration.
///
/// The key set is fetched once up front. A failure here is logged and not
/// fatal: the first guarded request retries the fetch.
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig::from_config(config)?;
    tracing::info!(
        issuer = %auth_config.issuer(),
        audience = %auth_config.audience,
        jwks_url = %auth_config.jwks_url,
        "Authorization configured"
    );

    let gate = AuthGate::from_config(auth_config)
        .map_err(|e| anyhow::anyhow!("Failed to build JWKS client: {}", e))?;

    match gate.verifier().key_set_provider().current_key_set().await {
        Ok(keys) => tracing::info!(keys = keys.len(), "Signing keys loaded"),
        Err(e) => tracing::warn!(error = %e, "Signing keys unavailable at startup"),
    }

    let drinks: Arc<dyn DrinkRepository> = Arc::new(InMemoryDrinkRepository::with_starter_menu());
    Ok(build_router(gate, drinks))
}

/// Assemble the router from already constructed parts
pub fn build_router(auth: AuthGate, drinks: Arc<dyn DrinkRepository>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "Coffee Shop API v0.0.1-SNAPSHOT" }))
        .merge(coffeeshop_drinks::routes(DrinksState::new(drinks, auth)))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
