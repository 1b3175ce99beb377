use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use mindclub_core::AppError;

use crate::auth::jwt::JwtService;
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

/// Bearer token of the request. `Ok(None)` when no Authorization header is sent.
fn bearer_token(request: &Request) -> Result<Option<&str>, AppError> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

fn authenticate(auth_state: &AuthState, request: &Request) -> Result<Option<AuthContext>, AppError> {
    match bearer_token(request)? {
        Some(token) => {
            let claims = auth_state.jwt.verify(token)?;
            Ok(Some(AuthContext::from(claims)))
        }
        None => Ok(None),
    }
}

/// Require a valid bearer token and store the caller's `AuthContext`.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth_state, &request) {
        Ok(Some(ctx)) => {
            tracing::debug!(account_id = %ctx.account_id, role = %ctx.role, "Request authenticated");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Ok(None) => HttpAppError(AppError::Unauthorized(
            "Missing authorization header".to_string(),
        ))
        .into_response(),
        Err(e) => HttpAppError(e).into_response(),
    }
}

/// Store the caller's `AuthContext` when a token is sent. Anonymous requests pass
/// through; a token that fails verification is still rejected.
pub async fn optional_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth_state, &request) {
        Ok(Some(ctx)) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => HttpAppError(e).into_response(),
    }
}

/// Reject callers without the admin role. Runs inside `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    match request.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.is_admin() => next.run(request).await,
        Some(ctx) => {
            tracing::debug!(account_id = %ctx.account_id, "Admin route refused");
            HttpAppError(AppError::Forbidden("Admin access required".to_string())).into_response()
        }
        None => HttpAppError(AppError::Unauthorized("Authentication required".to_string()))
            .into_response(),
    }
}
