//! Shared test utilities: synthetic rasters, encoded upload bytes and a
//! recording store that can be told to fail.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let upload = png_bytes(&bordered_image(100, 80, (10, 10, 80, 60), Rgb([0, 0, 0]), Rgb([200, 0, 0])));
//! let store = FailingStore::failing_on(2);
//! let result = run_pipeline(&upload, SizeCeiling::Large, ImageType::Thumbnail, "f.png", "p", &store);
//! assert!(result.is_err());
//! assert_eq!(store.saved_paths(), vec!["p/small/f.png".to_string()]);
//! ```

use crate::store::{Store, StoreError};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::sync::Mutex;

// =========================================================================
// Synthetic images
// =========================================================================

/// Single-colour RGB image.
pub fn solid_image(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
}

/// Image with a distinct value at almost every pixel.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// `border` everywhere except a `(x, y, w, h)` rectangle of `content`.
pub fn bordered_image(
    width: u32,
    height: u32,
    content_rect: (u32, u32, u32, u32),
    border: Rgb<u8>,
    content: Rgb<u8>,
) -> DynamicImage {
    let (cx, cy, cw, ch) = content_rect;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if x >= cx && x < cx + cw && y >= cy && y < cy + ch {
            content
        } else {
            border
        }
    }))
}

// =========================================================================
// Upload bytes
// =========================================================================

pub fn jpeg_bytes(img: &DynamicImage) -> Vec<u8> {
    let rgb = img.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 95)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let rgb = img.to_rgb8();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

// =========================================================================
// Recording store
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Save(String),
    Delete(String),
}

/// Store that records every call and fails the N-th save (1-based).
/// Uses Mutex (not RefCell) so it is Sync like every other store.
#[derive(Default)]
pub struct FailingStore {
    fail_on_save: Option<usize>,
    operations: Mutex<Vec<RecordedOp>>,
    saved: Mutex<Vec<String>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(save_number: usize) -> Self {
        Self {
            fail_on_save: Some(save_number),
            ..Self::default()
        }
    }

    pub fn get_operations(&self) -> Vec<RecordedOp> {
        self.operations.lock().unwrap().clone()
    }

    /// Paths whose save succeeded.
    pub fn saved_paths(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

impl Store for FailingStore {
    fn save(&self, path: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        let mut ops = self.operations.lock().unwrap();
        ops.push(RecordedOp::Save(path.to_string()));
        let attempt = ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Save(_)))
            .count();
        if self.fail_on_save == Some(attempt) {
            return Err(StoreError::Backend(format!("injected failure on {path}")));
        }
        self.saved.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.operations
            .lock()
            .unwrap()
            .push(RecordedOp::Delete(path.to_string()));
        Ok(())
    }
}
