//! Shared key helpers for storage backends.
//!
//! Keys have the form `{folder}/{file_name}` with the folder normalized to have no
//! leading or trailing slash. Keys never contain `..`.

use crate::traits::{StorageError, StorageResult};

const MAX_FILENAME_LENGTH: usize = 255;

/// Replace anything outside `[A-Za-z0-9._-]` and drop directory components.
pub fn sanitize_file_name(file_name: &str) -> StorageResult<String> {
    let base = std::path::Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);

    if base.contains("..") {
        return Err(StorageError::InvalidKey(
            "File name contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = base
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        return Err(StorageError::InvalidKey("File name is empty".to_string()));
    }

    Ok(sanitized)
}

pub fn normalize_folder(folder: &str) -> StorageResult<String> {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.split('/').any(|part| part == ".." || part == ".") {
        return Err(StorageError::InvalidKey(format!(
            "Folder contains invalid segment: {}",
            folder
        )));
    }
    Ok(trimmed.to_string())
}

/// Build the storage key for a file inside a folder.
pub fn storage_key(folder: &str, file_name: &str) -> StorageResult<String> {
    let folder = normalize_folder(folder)?;
    let file_name = sanitize_file_name(file_name)?;
    if folder.is_empty() {
        Ok(file_name)
    } else {
        Ok(format!("{}/{}", folder, file_name))
    }
}
