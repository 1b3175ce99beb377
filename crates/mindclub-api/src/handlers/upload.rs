use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use mindclub_core::models::MediaReference;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    /// Base64 data URI (`data:image/png;base64,...`)
    pub image: String,
}

/// Upload a standalone image, e.g. for a rich-text editor. The returned reference
/// is not tracked by any document until a client saves it into one.
#[utoipa::path(
    post,
    path = "/api/upload/image",
    tag = "media",
    request_body = UploadImageRequest,
    responses(
        (status = 201, description = "Image stored", body = MediaReference),
        (status = 400, description = "Not an image data URI", body = ErrorResponse),
        (status = 422, description = "Image could not be decoded", body = ErrorResponse),
        (status = 502, description = "Media store rejected the upload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(account_id = %ctx.account_id))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<UploadImageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MediaReference>>), HttpAppError> {
    let reference = state.media.upload_image(&request.image).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(reference).with_message("Image uploaded")),
    ))
}
