//! Raster → bytes for each [`OutputFormat`].
//!
//! | Format | Encoder | Quality |
//! |---|---|---|
//! | JPEG | `image::codecs::jpeg::JpegEncoder` | clamped to 1–100 |
//! | PNG | `image::codecs::png::PngEncoder`, default compression | ignored |
//! | WebP | none | always [`ImagingError::UnsupportedFormat`] |
//!
//! Output is always flattened to 8-bit RGB; no variant carries alpha.

use super::ImagingError;
use super::params::{OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

/// Encoded bytes plus the content type to store them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Encode `image` as `format`.
pub fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<EncodedImage, ImagingError> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::InvalidDimensions { width, height });
    }

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let q = quality.value().clamp(1, 100);
            JpegEncoder::new_with_quality(&mut bytes, q).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut bytes, CompressionType::Default, PngFilter::Adaptive)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
        OutputFormat::WebP => return Err(ImagingError::UnsupportedFormat(format)),
    }

    Ok(EncodedImage {
        bytes,
        content_type: format.content_type(),
    })
}
