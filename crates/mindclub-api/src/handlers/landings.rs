//! Landing page content

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use mindclub_core::models::EntityKind;
use serde_json::Value;

use crate::auth::MaybeAuth;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::entities::{self, ItemResponse, ListResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/landings",
    tag = "landings",
    responses((status = 200, description = "Landing pages, newest first"))
)]
pub async fn list_landings(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
) -> Result<ListResponse, HttpAppError> {
    entities::list(&state, EntityKind::Landing, &caller).await
}

#[utoipa::path(
    get,
    path = "/api/landings/{id}",
    tag = "landings",
    params(("id" = String, Path, description = "Landing ID")),
    responses(
        (status = 200, description = "Landing page"),
        (status = 404, description = "Landing not found", body = ErrorResponse)
    )
)]
pub async fn get_landing(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::get(&state, EntityKind::Landing, &id, &caller).await
}

#[utoipa::path(
    post,
    path = "/api/landings",
    tag = "landings",
    responses(
        (status = 201, description = "Landing created; inline media uploaded"),
        (status = 422, description = "Embedded media could not be decoded", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_landing(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<(StatusCode, ItemResponse), HttpAppError> {
    entities::create(&state, EntityKind::Landing, payload).await
}

#[utoipa::path(
    put,
    path = "/api/landings/{id}",
    tag = "landings",
    params(("id" = String, Path, description = "Landing ID")),
    responses(
        (status = 200, description = "Landing replaced; orphaned media deleted"),
        (status = 404, description = "Landing not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_landing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<ItemResponse, HttpAppError> {
    entities::update(&state, EntityKind::Landing, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/landings/{id}",
    tag = "landings",
    params(("id" = String, Path, description = "Landing ID")),
    responses(
        (status = 200, description = "Landing and its media deleted"),
        (status = 404, description = "Landing not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_landing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::delete(&state, EntityKind::Landing, &id).await
}
