//! Media store setup

use anyhow::{Context, Result};
use mindclub_core::Config;
use mindclub_storage::{create_media_store, MediaStore};
use std::sync::Arc;

pub async fn setup_media_store(config: &Config) -> Result<Arc<dyn MediaStore>> {
    tracing::info!("Initializing media store...");
    let store = create_media_store(config)
        .await
        .context("Failed to initialize media store")?;
    tracing::info!(
        backend = store.backend_name(),
        "Media store initialized successfully"
    );
    Ok(store)
}
