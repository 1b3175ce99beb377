//! Inline media envelope
//!
//! Clients submit new media as `data:<mime>[;params];base64,<payload>` strings in
//! place of a stored reference. The envelope is only ever input; nothing persists it.

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use thiserror::Error;

pub const INLINE_PREFIX: &str = "data:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InlineMediaError {
    #[error("Inline media must start with 'data:'")]
    MissingPrefix,

    #[error("Inline media is missing the ',' payload separator")]
    MissingSeparator,

    #[error("Inline media must be base64 encoded")]
    NotBase64,

    #[error("Inline media has an empty mime type")]
    EmptyMime,

    #[error("Inline media payload is not valid base64: {0}")]
    InvalidPayload(String),
}

/// Content category declared by the mime type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Video,
    Document,
    Other,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Video => "video",
            MediaCategory::Document => "document",
            MediaCategory::Other => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    mime: String,
    data: Bytes,
}

impl InlineMedia {
    pub fn new(mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// The content-prefix marker test: does this string carry embedded bytes?
    pub fn is_inline(value: &str) -> bool {
        value.starts_with(INLINE_PREFIX)
    }

    pub fn parse(value: &str) -> Result<Self, InlineMediaError> {
        let rest = value
            .strip_prefix(INLINE_PREFIX)
            .ok_or(InlineMediaError::MissingPrefix)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(InlineMediaError::MissingSeparator)?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(InlineMediaError::NotBase64);
        }
        if mime.is_empty() {
            return Err(InlineMediaError::EmptyMime);
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| InlineMediaError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            mime,
            data: Bytes::from(data),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn category(&self) -> MediaCategory {
        let mime = self.mime.as_str();
        if mime.starts_with("image/") {
            MediaCategory::Image
        } else if mime.starts_with("video/") {
            MediaCategory::Video
        } else if mime.starts_with("application/") || mime.starts_with("text/") {
            MediaCategory::Document
        } else {
            MediaCategory::Other
        }
    }

    /// File extension for generated names, from the mime subtype
    pub fn extension(&self) -> String {
        let subtype = self.mime.split('/').nth(1).unwrap_or("bin");
        let ext = match subtype {
            "jpeg" | "pjpeg" => "jpg",
            "svg+xml" => "svg",
            "quicktime" => "mov",
            "x-matroska" => "mkv",
            "vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
            "msword" => "doc",
            "plain" => "txt",
            other => other,
        };
        let ext: String = ext
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect();
        if ext.is_empty() {
            "bin".to_string()
        } else {
            ext
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("{}{};base64,{}", INLINE_PREFIX, self.mime, STANDARD.encode(&self.data))
    }
}
