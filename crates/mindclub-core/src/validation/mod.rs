//! Field validators shared by the typed entity inputs

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub const MAX_BIO_LENGTH: usize = 300;
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Required text fields are trimmed before the emptiness check.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    match value {
        "male" | "female" | "other" => Ok(()),
        _ => {
            let mut err = ValidationError::new("gender");
            err.message = Some(Cow::Borrowed("must be one of male, female, other"));
            Err(err)
        }
    }
}

pub fn validate_bio(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() > MAX_BIO_LENGTH {
        let mut err = ValidationError::new("bio_length");
        err.message = Some(Cow::Borrowed("must be at most 300 characters"));
        return Err(err);
    }
    Ok(())
}

/// Lowercased, trimmed e-mail used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Serde hook for request e-mails, so `#[validate(email)]` sees the normalized form.
pub fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_email(&raw))
}
