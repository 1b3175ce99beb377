//! Mindclub Processing Library
//!
//! Parsing of inline media payloads and the image compression pre-pass applied
//! before media reaches the remote store.

pub mod compression;
pub mod inline;

pub use compression::{fit_within, ImageNormalizer, MaxDimensions, ProcessingError};
pub use inline::{InlineMedia, InlineMediaError, MediaCategory, INLINE_PREFIX};
