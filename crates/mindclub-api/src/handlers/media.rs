//! Direct access to stored media for admins.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use mindclub_storage::FileDetails;
use serde_json::{json, Value};

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/media/{file_id}",
    tag = "media",
    params(("file_id" = String, Path, description = "Media store file id")),
    responses(
        (status = 200, description = "Stored object metadata"),
        (status = 404, description = "No such file", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_media_details(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<FileDetails>>, HttpAppError> {
    let details = state.media.store().get_details(&file_id).await?;
    Ok(Json(ApiResponse::new(details)))
}

/// Delete a stored object outright. Unlike cleanup after a document write, a
/// failure here is returned to the caller.
#[utoipa::path(
    delete,
    path = "/api/media/{file_id}",
    tag = "media",
    params(("file_id" = String, Path, description = "Media store file id")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 502, description = "Media store refused the delete", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, HttpAppError> {
    state.media.store().delete(&file_id).await?;
    tracing::info!(file_id = %file_id, "Media deleted by admin");
    Ok(Json(
        ApiResponse::new(json!({ "fileId": file_id })).with_message("Media deleted"),
    ))
}
