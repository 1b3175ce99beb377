//! Paid enrollment in online workshops, plus manual enrollment by admins.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use mindclub_core::models::{
    Enrollment, ManualEnrollmentRequest, OrderRequest, OrderResponse, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AdminContext, AuthContext};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/enrollments/order",
    tag = "enrollments",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Gateway order for the payable part of the cart", body = OrderResponse),
        (status = 400, description = "Empty cart or nothing left to pay for", body = ErrorResponse),
        (status = 404, description = "Cart references an unknown workshop", body = ErrorResponse),
        (status = 503, description = "Payments are not configured", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<OrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, HttpAppError> {
    request.validate()?;
    let cart: Vec<Uuid> = request.cart.iter().map(|item| item.id).collect();
    let order = state.enrollments.create_order(ctx.account_id, &cart).await?;
    Ok(Json(ApiResponse::new(order)))
}

#[utoipa::path(
    post,
    path = "/api/enrollments/verify",
    tag = "enrollments",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified and enrollments recorded", body = VerifyPaymentResponse),
        (status = 400, description = "Signature does not match", body = ErrorResponse),
        (status = 403, description = "Order belongs to another account", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(request): ValidatedJson<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<VerifyPaymentResponse>>, HttpAppError> {
    request.validate()?;
    let verified = state
        .enrollments
        .verify_payment(ctx.account_id, &request)
        .await?;
    Ok(Json(
        ApiResponse::new(verified).with_message("Payment verified"),
    ))
}

#[utoipa::path(
    post,
    path = "/api/enrollments/manual",
    tag = "enrollments",
    request_body = ManualEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment recorded without payment", body = Enrollment),
        (status = 404, description = "Unknown user or workshop", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, admin, request), fields(admin_id = %admin.0.account_id))]
pub async fn manual_enroll(
    State(state): State<Arc<AppState>>,
    admin: AdminContext,
    ValidatedJson(request): ValidatedJson<ManualEnrollmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), HttpAppError> {
    let document = state
        .enrollments
        .manual_enroll(request.user_id, request.workshop_id)
        .await?;
    let enrollment = Enrollment::from_document(&document)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(enrollment).with_message("Enrolled")),
    ))
}
