//! Day-by-day itineraries

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
    path = "/api/itineraries",
    tag = "itineraries",
    responses((status = 200, description = "Itineraries ordered by day"))
)]
pub async fn list_itineraries(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
) -> Result<ListResponse, HttpAppError> {
    entities::list(&state, EntityKind::Itinerary, &caller).await
}

#[utoipa::path(
    get,
    path = "/api/itineraries/{id}",
    tag = "itineraries",
    params(("id" = String, Path, description = "Itinerary ID")),
    responses(
        (status = 200, description = "Itinerary"),
        (status = 404, description = "Itinerary not found", body = ErrorResponse)
    )
)]
pub async fn get_itinerary(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::get(&state, EntityKind::Itinerary, &id, &caller).await
}

#[utoipa::path(
    post,
    path = "/api/itineraries",
    tag = "itineraries",
    responses(
        (status = 201, description = "Itinerary created; inline media uploaded"),
        (status = 422, description = "Embedded media could not be decoded", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_itinerary(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<(StatusCode, ItemResponse), HttpAppError> {
    entities::create(&state, EntityKind::Itinerary, payload).await
}

#[utoipa::path(
    put,
    path = "/api/itineraries/{id}",
    tag = "itineraries",
    params(("id" = String, Path, description = "Itinerary ID")),
    responses(
        (status = 200, description = "Itinerary replaced; orphaned media deleted"),
        (status = 404, description = "Itinerary not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_itinerary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<ItemResponse, HttpAppError> {
    entities::update(&state, EntityKind::Itinerary, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/itineraries/{id}",
    tag = "itineraries",
    params(("id" = String, Path, description = "Itinerary ID")),
    responses(
        (status = 200, description = "Itinerary and its media deleted"),
        (status = 404, description = "Itinerary not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_itinerary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::delete(&state, EntityKind::Itinerary, &id).await
}
