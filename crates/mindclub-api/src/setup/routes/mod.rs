//! Route configuration and setup.
//!
//! Route groups by access level live in [domains](domains); health checks in [health](health).

mod domains;
mod health;

use crate::auth::middleware::{
    admin_middleware, auth_middleware, optional_auth_middleware, AuthState,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use mindclub_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt: state.jwt.clone(),
    });

    let content_reads = domains::content_read_routes().layer(
        axum::middleware::from_fn_with_state(auth_state.clone(), optional_auth_middleware),
    );
    let account_routes = domains::account_routes().layer(axum::middleware::from_fn_with_state(
        auth_state.clone(),
        auth_middleware,
    ));
    let admin_routes = domains::admin_routes()
        .layer(axum::middleware::from_fn(admin_middleware))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let max_concurrent = config.max_concurrent_requests().max(1);
    let request_timeout = Duration::from_secs(config.request_timeout_seconds().max(1));
    tracing::info!(
        max_concurrent_requests = max_concurrent,
        request_timeout_secs = request_timeout.as_secs(),
        max_body_bytes = config.max_body_bytes(),
        "HTTP limits configured"
    );

    let app = public_routes()
        .merge(domains::auth_routes())
        .merge(content_reads)
        .merge(account_routes)
        .merge(admin_routes)
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(max_concurrent))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
