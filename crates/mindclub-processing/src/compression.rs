use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use thiserror::Error;

use crate::inline::InlineMedia;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Image processing task failed: {0}")]
    Task(String),
}

/// Bounding box an image must fit inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDimensions {
    pub width: u32,
    pub height: u32,
}

impl MaxDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }
}

/// Largest size with the same aspect ratio that fits inside `max`. Never upscales.
pub fn fit_within(width: u32, height: u32, max: MaxDimensions) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max.width && height <= max.height) {
        return (width, height);
    }

    let scale = f64::min(
        max.width as f64 / width as f64,
        max.height as f64 / height as f64,
    );
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max.width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max.height);
    (new_width, new_height)
}

/// Compression pre-pass: decode, fit inside a cap, re-encode as progressive JPEG.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageNormalizer {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Normalize an inline image and return it in the same envelope format.
    /// Undecodable input is an error, never passed through.
    pub async fn normalize(
        &self,
        media: &InlineMedia,
        max: MaxDimensions,
    ) -> Result<InlineMedia, ProcessingError> {
        let data = media.data().clone();
        let quality = self.quality;

        let jpeg = tokio::task::spawn_blocking(move || normalize_bytes(&data, max, quality))
            .await
            .map_err(|e| ProcessingError::Task(e.to_string()))??;

        Ok(InlineMedia::new("image/jpeg", jpeg))
    }
}

fn normalize_bytes(data: &[u8], max: MaxDimensions, quality: u8) -> Result<Bytes, ProcessingError> {
    let img = image::load_from_memory(data).map_err(|e| ProcessingError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();
    let (target_width, target_height) = fit_within(width, height, max);

    let img = if (target_width, target_height) != (width, height) {
        img.resize_exact(target_width, target_height, FilterType::Lanczos3)
    } else {
        img
    };

    let encoded = compress_jpeg(&img, quality)?;

    tracing::debug!(
        original_width = width,
        original_height = height,
        width = target_width,
        height = target_height,
        input_bytes = data.len(),
        output_bytes = encoded.len(),
        "Normalized inline image"
    );

    Ok(encoded)
}

/// Compress to progressive JPEG using mozjpeg
fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessingError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let encode_err = |e: std::io::Error| ProcessingError::Encode(e.to_string());
    let mut comp = comp.start_compress(Vec::new()).map_err(encode_err)?;
    comp.write_scanlines(&rgb_img).map_err(encode_err)?;
    let jpeg_data = comp.finish().map_err(encode_err)?;

    Ok(Bytes::from(jpeg_data))
}
