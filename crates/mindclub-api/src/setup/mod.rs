//! Application setup and initialization
//!
//! Startup steps kept out of main.rs so tests can build the same router over
//! in-memory backends.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use mindclub_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(crate::telemetry::LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    crate::error::set_hide_error_details(config.is_production());

    tracing::info!(
        production = config.is_production(),
        "Configuration loaded and validated successfully"
    );

    let store = database::setup_database(&config).await?;
    let media_store = storage::setup_media_store(&config).await?;
    let gateway = services::setup_payment_gateway(&config)?;

    let state = services::initialize_services(&config, store, media_store, gateway);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
