use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mindclub_core::models::AccountRole;
use mindclub_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HttpAppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    pub sub: Uuid, // account id
    pub role: AccountRole,
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity taken from a verified token and stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub role: AccountRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

impl From<JwtClaims> for AuthContext {
    fn from(claims: JwtClaims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

/// Caller identity on routes where signing in is optional
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl MaybeAuth {
    pub fn is_admin(&self) -> bool {
        self.0.is_some_and(|ctx| ctx.is_admin())
    }
}

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<AuthContext>().copied()))
    }
}

/// Authenticated caller holding the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminContext(pub AuthContext);

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;
        if !ctx.is_admin() {
            return Err(HttpAppError(AppError::Forbidden(
                "Admin access required".to_string(),
            )));
        }
        Ok(AdminContext(ctx))
    }
}
