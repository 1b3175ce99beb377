//! On-field workshops. Mutations answer with the full refreshed list so the admin
//! dashboard can re-render without a second request.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mindclub_core::models::EntityKind;
use mindclub_services::CleanupReport;
use serde_json::Value;

use crate::auth::MaybeAuth;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::entities::{self, ItemResponse, ListResponse};
use crate::handlers::{parse_id, ApiResponse};
use crate::state::AppState;

async fn refreshed_list(
    state: &AppState,
    message: &str,
    cleanup: Option<&CleanupReport>,
) -> Result<ListResponse, HttpAppError> {
    let documents = state.entities.list(EntityKind::Workshop).await?;
    let data = documents.iter().map(|doc| doc.to_json()).collect();
    let mut response = ApiResponse::list(data).with_message(message);
    if let Some(report) = cleanup {
        response = response.with_cleanup(report);
    }
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/workshops",
    tag = "workshops",
    responses((status = 200, description = "Workshops, newest first"))
)]
pub async fn list_workshops(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
) -> Result<ListResponse, HttpAppError> {
    entities::list(&state, EntityKind::Workshop, &caller).await
}

#[utoipa::path(
    get,
    path = "/api/workshops/{id}",
    tag = "workshops",
    params(("id" = String, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop"),
        (status = 404, description = "Workshop not found", body = ErrorResponse)
    )
)]
pub async fn get_workshop(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::get(&state, EntityKind::Workshop, &id, &caller).await
}

#[utoipa::path(
    post,
    path = "/api/workshops",
    tag = "workshops",
    responses(
        (status = 201, description = "Workshop created; returns every workshop"),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 422, description = "Embedded media could not be decoded", body = ErrorResponse),
        (status = 502, description = "Media store rejected an upload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_workshop(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<(StatusCode, ListResponse), HttpAppError> {
    state.entities.create(EntityKind::Workshop, payload).await?;
    let list = refreshed_list(&state, "Workshop created", None).await?;
    Ok((StatusCode::CREATED, list))
}

#[utoipa::path(
    put,
    path = "/api/workshops/{id}",
    tag = "workshops",
    params(("id" = String, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop replaced; returns every workshop"),
        (status = 404, description = "Workshop not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload))]
pub async fn update_workshop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<ListResponse, HttpAppError> {
    let outcome = state
        .entities
        .update(EntityKind::Workshop, parse_id(&id)?, payload)
        .await?;
    refreshed_list(&state, "Workshop updated", Some(&outcome.cleanup)).await
}

#[utoipa::path(
    delete,
    path = "/api/workshops/{id}",
    tag = "workshops",
    params(("id" = String, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop and its media deleted; returns remaining workshops"),
        (status = 404, description = "Workshop not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_workshop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ListResponse, HttpAppError> {
    let outcome = state
        .entities
        .delete(EntityKind::Workshop, parse_id(&id)?)
        .await?;
    refreshed_list(&state, "Workshop deleted", Some(&outcome.cleanup)).await
}
