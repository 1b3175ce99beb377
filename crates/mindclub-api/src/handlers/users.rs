//! Account signup, signin and the caller's own profile.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use mindclub_core::models::{
    Account, AccountBody, AccountProfile, AccountRole, AuthResponse, Collection, EntityKind,
    SigninRequest, SignupRequest,
};
use mindclub_core::AppError;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::ApiResponse;
use crate::state::AppState;

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) async fn find_account_by_email(
    state: &AppState,
    email: &str,
) -> Result<Option<Account>, AppError> {
    let matches = state
        .store
        .find_by(Collection::Accounts, &json!({ "email": email }))
        .await?;
    matches.first().map(Account::from_document).transpose()
}

/// Hashes the password and stores a new account. Fails with a conflict when the
/// email is already registered.
pub(crate) async fn create_account(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    phone: Option<String>,
    role: AccountRole,
) -> Result<Account, AppError> {
    let email = normalize_email(email);
    if find_account_by_email(state, &email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "An account with email {} already exists",
            email
        )));
    }

    let body = AccountBody {
        name: name.trim().to_string(),
        email,
        password: hash_password(password)?,
        phone,
        bio: None,
        avatar: None,
        gender: None,
        dob: None,
        role,
    };
    let document = state
        .entities
        .create(EntityKind::UserProfile, serde_json::to_value(&body)?)
        .await?;
    tracing::info!(account_id = %document.id, role = %role, "Account created");
    Account::from_document(&document)
}

pub(crate) fn auth_response(state: &AppState, account: &Account) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        token: state.jwt.issue(account.id, account.body.role)?,
        user: account.profile(),
    })
}

/// Looks up the account and checks the password. Unknown emails and wrong
/// passwords produce the same error.
pub(crate) async fn check_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let invalid = || AppError::Validation("Invalid email or password".to_string());
    let account = find_account_by_email(state, &normalize_email(email))
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(password, &account.body.password)? {
        return Err(invalid());
    }
    Ok(account)
}

#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(email = %request.email))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), HttpAppError> {
    request.validate()?;
    let account = create_account(
        &state,
        &request.name,
        &request.email,
        &request.password,
        request.phone,
        AccountRole::User,
    )
    .await?;
    let response = auth_response(&state, &account)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response).with_message("Signed up")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/signin",
    tag = "users",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, HttpAppError> {
    request.validate()?;
    let account = check_credentials(&state, &request.email, &request.password).await?;
    let response = auth_response(&state, &account)?;
    Ok(Json(ApiResponse::new(response).with_message("Signed in")))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Caller's profile", body = AccountProfile),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<ApiResponse<AccountProfile>>, HttpAppError> {
    let document = state
        .entities
        .get(EntityKind::UserProfile, ctx.account_id)
        .await?;
    let account = Account::from_document(&document)?;
    Ok(Json(ApiResponse::new(account.profile())))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile updated; a replaced avatar is deleted", body = AccountProfile),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload), fields(account_id = %ctx.account_id))]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<Value>,
) -> Result<Json<ApiResponse<AccountProfile>>, HttpAppError> {
    let outcome = state
        .entities
        .update(EntityKind::UserProfile, ctx.account_id, payload)
        .await?;
    let account = Account::from_document(&outcome.document)?;
    Ok(Json(
        ApiResponse::new(account.profile())
            .with_message("Profile updated")
            .with_cleanup(&outcome.cleanup),
    ))
}
