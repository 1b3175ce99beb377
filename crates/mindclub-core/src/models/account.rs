use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::document::Document;
use crate::validation::{deserialize_email, not_blank, validate_bio, validate_gender};

/// Account role carried in issued tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    User,
    Admin,
}

impl Display for AccountRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AccountRole::User => write!(f, "user"),
            AccountRole::Admin => write!(f, "admin"),
        }
    }
}

/// Keys of an account document that a profile update may change.
pub const PROFILE_FIELDS: [&str; 6] = ["name", "phone", "bio", "avatar", "gender", "dob"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
    pub name: String,
    pub email: String,
    /// argon2 PHC string
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    pub role: AccountRole,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub body: AccountBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn from_document(doc: &Document) -> Result<Self, AppError> {
        let body = AccountBody::deserialize(&doc.body)
            .map_err(|e| AppError::Internal(format!("Corrupt account document {}: {}", doc.id, e)))?;
        Ok(Self {
            id: doc.id,
            body,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            name: self.body.name.clone(),
            email: self.body.email.clone(),
            phone: self.body.phone.clone(),
            bio: self.body.bio.clone(),
            avatar: self.body.avatar.clone().map(public_avatar),
            gender: self.body.gender.clone(),
            dob: self.body.dob.clone(),
            role: self.body.role,
            created_at: self.created_at,
        }
    }
}

/// The stored file id stays server side; a url-only avatar echoed back on update
/// is matched to it again by url.
fn public_avatar(mut avatar: Value) -> Value {
    if let Value::Object(map) = &mut avatar {
        map.remove("fileId");
    }
    avatar
}

/// Account as shown to its owner; never carries the password hash
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub avatar: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(custom(function = "not_blank", message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegisterRequest {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub registration_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountProfile,
}

/// Profile fields checked on every account document write.
#[derive(Debug, Deserialize, Validate)]
pub struct UserProfileInput {
    #[validate(custom(function = "not_blank", message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_bio"))]
    pub bio: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
}
