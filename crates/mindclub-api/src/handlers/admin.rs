//! Admin account registration and login.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use mindclub_core::models::{AccountRole, AdminRegisterRequest, AuthResponse, SigninRequest};
use mindclub_core::AppError;
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::users::{auth_response, check_credentials, create_account};
use crate::handlers::ApiResponse;
use crate::state::AppState;

fn check_registration_key(configured: Option<&str>, provided: &str) -> Result<(), AppError> {
    let Some(expected) = configured else {
        return Err(AppError::Forbidden(
            "Admin registration is disabled".to_string(),
        ));
    };
    if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Invalid registration key".to_string()))
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/register",
    tag = "admin",
    request_body = AdminRegisterRequest,
    responses(
        (status = 201, description = "Admin account created", body = AuthResponse),
        (status = 403, description = "Registration key missing or wrong", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AdminRegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), HttpAppError> {
    request.validate()?;
    check_registration_key(
        state.config.admin_registration_key(),
        &request.registration_key,
    )?;
    let account = create_account(
        &state,
        &request.name,
        &request.email,
        &request.password,
        None,
        AccountRole::Admin,
    )
    .await?;
    let response = auth_response(&state, &account)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response).with_message("Admin registered")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "admin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in as admin", body = AuthResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 403, description = "Account is not an admin", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, HttpAppError> {
    request.validate()?;
    let account = check_credentials(&state, &request.email, &request.password).await?;
    if account.body.role != AccountRole::Admin {
        tracing::warn!(account_id = %account.id, "Non-admin account attempted admin login");
        return Err(AppError::Forbidden("Admin access required".to_string()).into());
    }
    let response = auth_response(&state, &account)?;
    Ok(Json(ApiResponse::new(response).with_message("Signed in")))
}
