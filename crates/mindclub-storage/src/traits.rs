//! Remote media store abstraction
//!
//! Every backend (ImageKit, local filesystem) implements `MediaStore`. Objects are
//! addressed by an opaque file identifier chosen by the backend at upload time.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub url: String,
    pub file_id: String,
}

/// Metadata of a stored object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    pub file_id: String,
    pub name: String,
    pub url: String,
    pub file_path: String,
    pub size: u64,
    pub mime: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` as `file_name` inside `folder` and return its public URL and file id
    async fn upload(&self, data: Bytes, file_name: &str, folder: &str)
        -> StorageResult<StoredFile>;

    /// Delete an object. Deleting an id that no longer exists succeeds.
    async fn delete(&self, file_id: &str) -> StorageResult<()>;

    /// Look up an object's metadata; `StorageError::NotFound` when absent
    async fn get_details(&self, file_id: &str) -> StorageResult<FileDetails>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
