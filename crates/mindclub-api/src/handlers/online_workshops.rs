//! Online workshops. Meeting link, password and id are only shown to admins and
//! to accounts enrolled in the workshop.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mindclub_core::models::{Document, EntityKind, MEETING_SECRET_KEYS};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthContext, MaybeAuth};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::entities::{self, ItemResponse, ListResponse};
use crate::handlers::{parse_id, present, ApiResponse};
use crate::state::AppState;

fn hide_meeting_details(json: &mut Value) {
    if let Value::Object(map) = json {
        for key in MEETING_SECRET_KEYS {
            map.remove(key);
        }
    }
}

fn present_online(document: &Document, caller: &MaybeAuth, enrolled: bool) -> Value {
    let mut json = present(document, caller);
    if !caller.is_admin() && !enrolled {
        hide_meeting_details(&mut json);
    }
    json
}

async fn enrolled_ids(state: &AppState, caller: &MaybeAuth) -> Result<BTreeSet<Uuid>, HttpAppError> {
    match caller.0 {
        Some(ctx) if !ctx.is_admin() => Ok(state
            .enrollments
            .enrolled_workshops(ctx.account_id)
            .await?
            .iter()
            .map(|doc| doc.id)
            .collect()),
        _ => Ok(BTreeSet::new()),
    }
}

#[utoipa::path(
    get,
    path = "/api/online-workshops",
    tag = "online-workshops",
    responses(
        (status = 200, description = "Online workshops, newest first"),
        (status = 401, description = "A token was sent but is invalid", body = ErrorResponse)
    )
)]
pub async fn list_online_workshops(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
) -> Result<ListResponse, HttpAppError> {
    let documents = state.entities.list(EntityKind::OnlineWorkshop).await?;
    let enrolled = enrolled_ids(&state, &caller).await?;
    let data = documents
        .iter()
        .map(|doc| present_online(doc, &caller, enrolled.contains(&doc.id)))
        .collect();
    Ok(Json(ApiResponse::list(data)))
}

#[utoipa::path(
    get,
    path = "/api/online-workshops/{id}",
    tag = "online-workshops",
    params(("id" = String, Path, description = "Online workshop ID")),
    responses(
        (status = 200, description = "Online workshop"),
        (status = 404, description = "Online workshop not found", body = ErrorResponse)
    )
)]
pub async fn get_online_workshop(
    State(state): State<Arc<AppState>>,
    caller: MaybeAuth,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    let document = state
        .entities
        .get(EntityKind::OnlineWorkshop, parse_id(&id)?)
        .await?;
    let enrolled = match caller.0 {
        Some(ctx) if !ctx.is_admin() => {
            state
                .enrollments
                .is_enrolled(ctx.account_id, document.id)
                .await?
        }
        _ => false,
    };
    Ok(Json(ApiResponse::new(present_online(&document, &caller, enrolled))))
}

#[utoipa::path(
    get,
    path = "/api/online-workshops/enrolled",
    tag = "online-workshops",
    responses(
        (status = 200, description = "Online workshops the caller is enrolled in, with meeting details"),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_enrolled_workshops(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<ListResponse, HttpAppError> {
    let caller = MaybeAuth(Some(ctx));
    let documents = state.enrollments.enrolled_workshops(ctx.account_id).await?;
    let data = documents
        .iter()
        .map(|doc| present_online(doc, &caller, true))
        .collect();
    Ok(Json(ApiResponse::list(data)))
}

#[utoipa::path(
    post,
    path = "/api/online-workshops",
    tag = "online-workshops",
    responses(
        (status = 201, description = "Online workshop created"),
        (status = 400, description = "Missing required fields", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_online_workshop(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<(StatusCode, ItemResponse), HttpAppError> {
    entities::create(&state, EntityKind::OnlineWorkshop, payload).await
}

#[utoipa::path(
    put,
    path = "/api/online-workshops/{id}",
    tag = "online-workshops",
    params(("id" = String, Path, description = "Online workshop ID")),
    responses(
        (status = 200, description = "Online workshop replaced; orphaned media deleted"),
        (status = 404, description = "Online workshop not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_online_workshop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<ItemResponse, HttpAppError> {
    entities::update(&state, EntityKind::OnlineWorkshop, &id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/online-workshops/{id}",
    tag = "online-workshops",
    params(("id" = String, Path, description = "Online workshop ID")),
    responses(
        (status = 200, description = "Online workshop and its media deleted"),
        (status = 404, description = "Online workshop not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_online_workshop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ItemResponse, HttpAppError> {
    entities::delete(&state, EntityKind::OnlineWorkshop, &id).await
}
