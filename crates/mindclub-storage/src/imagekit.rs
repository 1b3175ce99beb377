//! ImageKit media store
//!
//! Uploads go to the upload API as multipart forms; deletes and detail lookups go
//! to the management API. Both authenticate with HTTP basic auth using the
//! private key as username and an empty password.

use crate::keys::{normalize_folder, sanitize_file_name};
use crate::traits::{FileDetails, MediaStore, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const UPLOAD_ENDPOINT: &str = "https://upload.imagekit.io/api/v1/files/upload";
const MANAGEMENT_ENDPOINT: &str = "https://api.imagekit.io/v1/files";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    file_id: String,
    name: String,
    url: String,
    #[serde(default)]
    file_path: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    mime: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ImageKitStorage {
    client: Client,
    private_key: String,
    url_endpoint: String,
    upload_endpoint: String,
    management_endpoint: String,
}

impl ImageKitStorage {
    pub fn new(private_key: String, url_endpoint: String) -> StorageResult<Self> {
        if private_key.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "ImageKit private key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            private_key,
            url_endpoint,
            upload_endpoint: UPLOAD_ENDPOINT.to_string(),
            management_endpoint: MANAGEMENT_ENDPOINT.to_string(),
        })
    }

    /// Point the client at different API hosts (used against mock servers).
    pub fn with_endpoints(mut self, upload: impl Into<String>, management: impl Into<String>) -> Self {
        self.upload_endpoint = upload.into();
        self.management_endpoint = management.into().trim_end_matches('/').to_string();
        self
    }

    pub fn url_endpoint(&self) -> &str {
        &self.url_endpoint
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/{}", self.management_endpoint, urlencoding::encode(file_id))
    }
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    format!("HTTP {}: {}", status, text)
}

#[async_trait]
impl MediaStore for ImageKitStorage {
    async fn upload(
        &self,
        data: Bytes,
        file_name: &str,
        folder: &str,
    ) -> StorageResult<StoredFile> {
        let file_name = sanitize_file_name(file_name)?;
        let folder = format!("/{}", normalize_folder(folder)?);
        let size = data.len();
        let start = std::time::Instant::now();

        let part = Part::bytes(data.to_vec()).file_name(file_name.clone());
        let form = Form::new()
            .part("file", part)
            .text("fileName", file_name.clone())
            .text("folder", folder.clone())
            .text("useUniqueFileName", "false");

        let response = self
            .client
            .post(&self.upload_endpoint)
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let message = error_body(response).await;
            tracing::error!(file_name = %file_name, folder = %folder, error = %message, "ImageKit upload rejected");
            return Err(StorageError::UploadFailed(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Invalid upload response: {}", e)))?;

        tracing::info!(
            file_id = %body.file_id,
            folder = %folder,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ImageKit upload successful"
        );

        Ok(StoredFile {
            url: body.url,
            file_id: body.file_id,
        })
    }

    async fn delete(&self, file_id: &str) -> StorageResult<()> {
        if file_id.is_empty() {
            return Err(StorageError::InvalidKey("Empty file id".to_string()));
        }

        let start = std::time::Instant::now();
        let response = self
            .client
            .delete(self.file_url(file_id))
            .basic_auth(&self.private_key, Some(""))
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(file_id = %file_id, "ImageKit file already gone");
                Ok(())
            }
            status if status.is_success() => {
                tracing::info!(
                    file_id = %file_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "ImageKit delete successful"
                );
                Ok(())
            }
            _ => Err(StorageError::DeleteFailed(error_body(response).await)),
        }
    }

    async fn get_details(&self, file_id: &str) -> StorageResult<FileDetails> {
        let response = self
            .client
            .get(format!("{}/details", self.file_url(file_id)))
            .basic_auth(&self.private_key, Some(""))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(file_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(StorageError::BackendError(error_body(response).await));
        }

        let details: DetailsResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Invalid details response: {}", e)))?;

        Ok(FileDetails {
            file_id: details.file_id,
            name: details.name,
            url: details.url,
            file_path: details.file_path,
            size: details.size,
            mime: details.mime,
            width: details.width,
            height: details.height,
            created_at: details.created_at,
        })
    }

    fn backend_name(&self) -> &'static str {
        "imagekit"
    }
}
