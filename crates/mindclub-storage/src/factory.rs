use crate::{ImageKitStorage, LocalStorage, MediaBackend, MediaStore, StorageError, StorageResult};
use mindclub_core::Config;
use std::sync::Arc;

/// Create the media store selected by configuration
pub async fn create_media_store(config: &Config) -> StorageResult<Arc<dyn MediaStore>> {
    let media = config.media();

    match media.backend {
        MediaBackend::ImageKit => {
            let private_key = media.imagekit_private_key.clone().ok_or_else(|| {
                StorageError::ConfigError("IMAGEKIT_PRIVATE_KEY not configured".to_string())
            })?;
            let url_endpoint = media.imagekit_url_endpoint.clone().ok_or_else(|| {
                StorageError::ConfigError("IMAGEKIT_URL_ENDPOINT not configured".to_string())
            })?;

            let storage = ImageKitStorage::new(private_key, url_endpoint)?;
            Ok(Arc::new(storage))
        }

        MediaBackend::Local => {
            let storage = LocalStorage::new(
                media.local_storage_path.clone(),
                media.local_storage_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }
    }
}
