//! Service initialization and application state setup

use std::sync::Arc;

use anyhow::{Context, Result};
use mindclub_core::Config;
use mindclub_db::DocumentStore;
use mindclub_services::{
    EnrollmentService, EntityService, MediaReconciler, PaymentGateway, RazorpayGateway,
};
use mindclub_storage::MediaStore;

use crate::auth::JwtService;
use crate::state::AppState;

/// Payment gateway from config; `None` when no key pair is set
pub fn setup_payment_gateway(config: &Config) -> Result<Option<Arc<dyn PaymentGateway>>> {
    let gateway = RazorpayGateway::from_config(config.payment())
        .context("Failed to initialize payment gateway")?;
    match gateway {
        Some(gateway) => {
            tracing::info!(currency = %config.payment().currency, "Razorpay payments enabled");
            Ok(Some(Arc::new(gateway)))
        }
        None => {
            tracing::warn!("Razorpay keys not set; paid enrollment is disabled");
            Ok(None)
        }
    }
}

/// Wire the services together, returning the application state
pub fn initialize_services(
    config: &Config,
    store: Arc<dyn DocumentStore>,
    media_store: Arc<dyn MediaStore>,
    gateway: Option<Arc<dyn PaymentGateway>>,
) -> Arc<AppState> {
    let media = Arc::new(MediaReconciler::from_config(media_store, config.media()));
    let entities = EntityService::new(store.clone(), media.clone());
    let enrollments =
        EnrollmentService::new(store.clone(), gateway, config.payment().currency.clone());
    let jwt = JwtService::new(config.jwt_secret(), config.jwt_expiry_hours());

    tracing::info!(
        database_backend = store.backend_name(),
        media_backend = media.store().backend_name(),
        payments_enabled = enrollments.payments_enabled(),
        "Services initialized"
    );

    Arc::new(AppState {
        config: config.clone(),
        store,
        media,
        entities,
        enrollments,
        jwt,
        is_production: config.is_production(),
    })
}
