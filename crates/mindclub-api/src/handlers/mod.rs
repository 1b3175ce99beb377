//! HTTP handlers
//!
//! Every success body uses the same envelope: `{ success, message?, count?, data }`,
//! plus a `cleanup` summary on updates and deletes.

pub mod admin;
pub mod enrollments;
pub mod entities;
pub mod itineraries;
pub mod landings;
pub mod media;
pub mod online_workshops;
pub mod upload;
pub mod users;
pub mod workshops;

use mindclub_core::models::Document;
use mindclub_core::AppError;
use mindclub_services::{strip_file_ids, CleanupReport};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::MaybeAuth;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupSummary>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data,
            cleanup: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_cleanup(mut self, report: &CleanupReport) -> Self {
        self.cleanup = Some(CleanupSummary::from(report));
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        let mut response = Self::new(data);
        response.count = Some(count);
        response
    }
}

/// Counts of media deletions attempted after a write
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CleanupSummary {
    pub deleted: usize,
    pub failed: usize,
}

impl From<&CleanupReport> for CleanupSummary {
    fn from(report: &CleanupReport) -> Self {
        Self {
            deleted: report.deleted.len(),
            failed: report.failed.len(),
        }
    }
}

/// Client view of a stored document. File ids stay internal unless the caller is an admin.
pub(crate) fn present(document: &Document, caller: &MaybeAuth) -> Value {
    let mut json = document.to_json();
    if !caller.is_admin() {
        strip_file_ids(&mut json);
    }
    json
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid id: {}", raw)))
}
