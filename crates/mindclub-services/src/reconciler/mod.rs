//! Media Reference Reconciler
//!
//! One engine for every entity kind. `resolve` uploads inline media found at the
//! kind's declared paths and swaps each payload for a `{url, fileId}` reference.
//! `reconcile_after_update` and `delete_all` remove files no longer referenced,
//! best-effort, and report what happened.

mod file_ids;
mod paths;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use futures::stream::{self, StreamExt};
use mindclub_core::models::{EntityKind, ImageClass, MediaField, MediaReference, FILE_ID_KEY, URL_KEY};
use mindclub_core::{AppError, MediaConfig};
use mindclub_processing::{
    ImageNormalizer, InlineMedia, MaxDimensions, MediaCategory, ProcessingError,
};
use mindclub_storage::{MediaStore, StorageError};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub use file_ids::{collect_file_ids, restore_file_ids, retain_known_file_ids, strip_file_ids};
pub use paths::{pending_targets, MediaTarget};

/// A deletion that did not go through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDeletion {
    pub file_id: String,
    pub error: String,
}

/// Outcome of a best-effort cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    pub folder: String,
    pub upload_folder: String,
    pub avatar_folder: String,
    pub standard_cap: MaxDimensions,
    pub avatar_cap: MaxDimensions,
    pub upload_concurrency: usize,
    pub delete_concurrency: usize,
}

impl ReconcilerSettings {
    pub fn from_config(media: &MediaConfig) -> Self {
        Self {
            folder: media.folder.clone(),
            upload_folder: media.upload_folder.clone(),
            avatar_folder: media.avatar_folder.clone(),
            standard_cap: MaxDimensions::new(media.image_max_width, media.image_max_height),
            avatar_cap: MaxDimensions::square(media.avatar_max_dimension),
            upload_concurrency: media.upload_concurrency.max(1),
            delete_concurrency: media.delete_concurrency.max(1),
        }
    }

    fn folder_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::UserProfile => &self.avatar_folder,
            _ => &self.folder,
        }
    }

    fn cap_for(&self, class: ImageClass) -> MaxDimensions {
        match class {
            ImageClass::Standard => self.standard_cap,
            ImageClass::Avatar => self.avatar_cap,
        }
    }
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            folder: "workshops".to_string(),
            upload_folder: "/mind-club".to_string(),
            avatar_folder: "avatars".to_string(),
            standard_cap: MaxDimensions::new(1920, 1080),
            avatar_cap: MaxDimensions::square(512),
            upload_concurrency: 8,
            delete_concurrency: 16,
        }
    }
}

pub struct MediaReconciler {
    store: Arc<dyn MediaStore>,
    normalizer: ImageNormalizer,
    settings: ReconcilerSettings,
}

fn processing_error(err: ProcessingError) -> AppError {
    match err {
        ProcessingError::Decode(msg) => AppError::MediaDecode(msg),
        ProcessingError::Encode(msg) | ProcessingError::Task(msg) => {
            AppError::Internal(format!("Image processing failed: {}", msg))
        }
    }
}

fn upload_error(err: StorageError) -> AppError {
    AppError::MediaUpload(err.to_string())
}

/// `<category>_<unix_millis>_<8 hex>.<ext>`
fn generated_name(category: MediaCategory, extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", category.as_str(), millis, &suffix[..8], extension)
}

impl MediaReconciler {
    pub fn new(store: Arc<dyn MediaStore>, normalizer: ImageNormalizer, settings: ReconcilerSettings) -> Self {
        Self {
            store,
            normalizer,
            settings,
        }
    }

    pub fn from_config(store: Arc<dyn MediaStore>, media: &MediaConfig) -> Self {
        Self::new(
            store,
            ImageNormalizer::new(media.jpeg_quality),
            ReconcilerSettings::from_config(media),
        )
    }

    pub fn store(&self) -> &Arc<dyn MediaStore> {
        &self.store
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Resolve every inline payload at `kind`'s declared paths.
    ///
    /// Works on a deep copy; `payload` is never modified. Uploads run
    /// concurrently and all of them finish before the result is decided. Any
    /// failure fails the whole call; files uploaded by sibling fields stay in the
    /// store.
    pub async fn resolve(&self, kind: EntityKind, payload: &Value) -> Result<Value, AppError> {
        let mut resolved = payload.clone();

        let targets: Vec<(MediaTarget, Value)> = kind
            .media_paths()
            .iter()
            .flat_map(|path| pending_targets(&resolved, path))
            .filter_map(|target| {
                let value = resolved.pointer(&target.pointer)?.clone();
                Some((target, value))
            })
            .collect();

        if targets.is_empty() {
            return Ok(resolved);
        }

        let start = Instant::now();
        let count = targets.len();
        let folder = self.settings.folder_for(kind);

        let results: Vec<Result<(String, Value), AppError>> = stream::iter(targets)
            .map(|(target, value)| async move {
                let value = self.resolve_field(&value, target.class, folder).await?;
                Ok::<_, AppError>((target.pointer, value))
            })
            .buffer_unordered(self.settings.upload_concurrency)
            .collect()
            .await;

        for result in results {
            let (pointer, value) = result.inspect_err(|e| {
                tracing::error!(entity = %kind, error = %e, "Media resolve failed");
            })?;
            if let Some(slot) = resolved.pointer_mut(&pointer) {
                *slot = value;
            }
        }

        tracing::info!(
            entity = %kind,
            uploads = count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Inline media resolved"
        );

        Ok(resolved)
    }

    /// Resolve one media value: inline string, wrapper object, or passthrough.
    fn resolve_field<'a>(
        &'a self,
        value: &'a Value,
        class: ImageClass,
        folder: &'a str,
    ) -> futures::future::BoxFuture<'a, Result<Value, AppError>> {
        Box::pin(async move {
            match MediaField::classify(value) {
                MediaField::Inline(data) => {
                    let reference = self.upload_inline(data, class, folder).await?;
                    Ok(reference.to_value())
                }
                MediaField::Wrapper(map) => {
                    let inner = map.get(URL_KEY).cloned().unwrap_or(Value::Null);
                    let resolved = self.resolve_field(&inner, class, folder).await?;
                    let mut wrapper = map.clone();
                    match resolved {
                        Value::Object(reference) => {
                            for key in [URL_KEY, FILE_ID_KEY] {
                                if let Some(v) = reference.get(key) {
                                    wrapper.insert(key.to_string(), v.clone());
                                }
                            }
                        }
                        other => {
                            wrapper.insert(URL_KEY.to_string(), other);
                        }
                    }
                    Ok(Value::Object(wrapper))
                }
                MediaField::Passthrough => Ok(value.clone()),
            }
        })
    }

    async fn upload_inline(
        &self,
        data: &str,
        class: ImageClass,
        folder: &str,
    ) -> Result<MediaReference, AppError> {
        let media = InlineMedia::parse(data).map_err(|e| AppError::MediaDecode(e.to_string()))?;
        self.upload_media(media, class, folder).await
    }

    async fn upload_media(
        &self,
        media: InlineMedia,
        class: ImageClass,
        folder: &str,
    ) -> Result<MediaReference, AppError> {
        let category = media.category();

        let media = match category {
            MediaCategory::Image => self
                .normalizer
                .normalize(&media, self.settings.cap_for(class))
                .await
                .map_err(processing_error)?,
            _ => media,
        };

        let file_name = generated_name(category, &media.extension());
        let size = media.len();
        let start = Instant::now();

        let stored = self
            .store
            .upload(media.into_data(), &file_name, folder)
            .await
            .map_err(upload_error)?;

        tracing::info!(
            file_id = %stored.file_id,
            file_name = %file_name,
            category = category.as_str(),
            size_bytes = size,
            backend = self.store.backend_name(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Uploaded inline media"
        );

        Ok(MediaReference::new(stored.url, stored.file_id))
    }

    /// Compress and upload a standalone image to the upload folder.
    pub async fn upload_image(&self, data: &str) -> Result<MediaReference, AppError> {
        if !InlineMedia::is_inline(data) {
            return Err(AppError::Validation(
                "image must be a base64 data URI".to_string(),
            ));
        }
        let media = InlineMedia::parse(data).map_err(|e| AppError::MediaDecode(e.to_string()))?;
        if media.category() != MediaCategory::Image {
            return Err(AppError::Validation("Only image uploads are accepted".to_string()));
        }
        self.upload_media(media, ImageClass::Standard, &self.settings.upload_folder)
            .await
    }

    /// Delete files referenced by `old` but no longer by `new`.
    pub async fn reconcile_after_update(&self, old: &Value, new: &Value) -> CleanupReport {
        let live = collect_file_ids(new);
        let orphans: BTreeSet<String> = collect_file_ids(old)
            .into_iter()
            .filter(|id| !live.contains(id))
            .collect();
        self.delete_files(orphans).await
    }

    /// Delete every file referenced anywhere in `document`.
    pub async fn delete_all(&self, document: &Value) -> CleanupReport {
        self.delete_files(collect_file_ids(document)).await
    }

    /// Delete each id independently; failures are logged and reported, never raised.
    pub async fn delete_files(&self, ids: BTreeSet<String>) -> CleanupReport {
        if ids.is_empty() {
            return CleanupReport::default();
        }

        let outcomes: Vec<(String, Result<(), StorageError>)> = stream::iter(ids)
            .map(|file_id| async move {
                let result = self.store.delete(&file_id).await;
                (file_id, result)
            })
            .buffer_unordered(self.settings.delete_concurrency)
            .collect()
            .await;

        let mut report = CleanupReport::default();
        for (file_id, result) in outcomes {
            match result {
                Ok(()) => {
                    tracing::debug!(file_id = %file_id, "Deleted orphaned media");
                    report.deleted.push(file_id);
                }
                Err(e) => {
                    tracing::warn!(file_id = %file_id, error = %e, "Failed to delete media, leaving it behind");
                    report.failed.push(FailedDeletion {
                        file_id,
                        error: e.to_string(),
                    });
                }
            }
        }
        report.deleted.sort();
        report.failed.sort_by(|a, b| a.file_id.cmp(&b.file_id));
        report
    }
}

#[cfg(test)]
mod tests;
