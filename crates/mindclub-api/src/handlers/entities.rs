//! CRUD shared by the content entities. Route handlers in the sibling modules pick
//! the entity kind and shape the response.

use axum::{http::StatusCode, Json};
use mindclub_core::models::EntityKind;
use serde_json::{json, Value};

use crate::auth::MaybeAuth;
use crate::error::HttpAppError;
use crate::handlers::{parse_id, present, ApiResponse};
use crate::state::AppState;

pub(crate) type ListResponse = Json<ApiResponse<Vec<Value>>>;
pub(crate) type ItemResponse = Json<ApiResponse<Value>>;

pub(crate) async fn list(
    state: &AppState,
    kind: EntityKind,
    caller: &MaybeAuth,
) -> Result<ListResponse, HttpAppError> {
    let documents = state.entities.list(kind).await?;
    let data = documents.iter().map(|doc| present(doc, caller)).collect();
    Ok(Json(ApiResponse::list(data)))
}

pub(crate) async fn get(
    state: &AppState,
    kind: EntityKind,
    id: &str,
    caller: &MaybeAuth,
) -> Result<ItemResponse, HttpAppError> {
    let document = state.entities.get(kind, parse_id(id)?).await?;
    Ok(Json(ApiResponse::new(present(&document, caller))))
}

pub(crate) async fn create(
    state: &AppState,
    kind: EntityKind,
    payload: Value,
) -> Result<(StatusCode, ItemResponse), HttpAppError> {
    let document = state.entities.create(kind, payload).await?;
    let message = format!("{} created", kind.display_name());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(document.to_json()).with_message(message)),
    ))
}

pub(crate) async fn update(
    state: &AppState,
    kind: EntityKind,
    id: &str,
    payload: Value,
) -> Result<ItemResponse, HttpAppError> {
    let outcome = state.entities.update(kind, parse_id(id)?, payload).await?;
    let message = format!("{} updated", kind.display_name());
    Ok(Json(
        ApiResponse::new(outcome.document.to_json())
            .with_message(message)
            .with_cleanup(&outcome.cleanup),
    ))
}

pub(crate) async fn delete(
    state: &AppState,
    kind: EntityKind,
    id: &str,
) -> Result<ItemResponse, HttpAppError> {
    let outcome = state.entities.delete(kind, parse_id(id)?).await?;
    let message = format!("{} deleted", kind.display_name());
    Ok(Json(
        ApiResponse::new(json!({ "_id": outcome.id }))
            .with_message(message)
            .with_cleanup(&outcome.cleanup),
    ))
}
