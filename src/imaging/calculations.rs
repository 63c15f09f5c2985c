//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::ImageType;

/// Width-to-height ratio used for 16:9 native boxes.
pub const WIDESCREEN_RATIO: f64 = 1.778;

/// Largest aspect-correct box that fits inside the source.
///
/// Profile photos use the largest centred square; thumbnails use the largest
/// 16:9 box, preferring full width when the derived height fits.
///
/// # Examples
/// ```
/// # use sketchbook_variants::imaging::{native_box, ImageType};
/// assert_eq!(native_box(ImageType::Thumbnail, (1920, 1080)), (1920, 1080));
/// assert_eq!(native_box(ImageType::Thumbnail, (626, 209)), (372, 209));
/// assert_eq!(native_box(ImageType::Profile, (300, 209)), (209, 209));
/// ```
pub fn native_box(image_type: ImageType, source: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    match image_type {
        ImageType::Profile => {
            let side = src_w.min(src_h);
            (side, side)
        }
        ImageType::Thumbnail => {
            let h = (src_w as f64 / WIDESCREEN_RATIO).round() as u32;
            if h <= src_h {
                (src_w, h)
            } else {
                let w = (src_h as f64 * WIDESCREEN_RATIO).round() as u32;
                (w.min(src_w), src_h)
            }
        }
    }
}

/// Pick the box for an adaptive tier.
///
/// - native narrower than `floor` → `floor` (a tier never shrinks below the one before it)
/// - native narrower than `canonical` → native (never upscale a mid tier past the source)
/// - otherwise → `canonical`
pub fn adapt_tier(native: (u32, u32), floor: (u32, u32), canonical: (u32, u32)) -> (u32, u32) {
    if native.0 < floor.0 {
        floor
    } else if native.0 < canonical.0 {
        native
    } else {
        canonical
    }
}

/// Resized dimensions that completely cover the target box.
///
/// Uniform scale `max(tw/sw, th/sh)`; both results are at least the target
/// so the centre crop always has enough pixels.
///
/// # Arguments
/// * `source` - Source dimensions (width, height), both non-zero
/// * `target` - Target box (width, height)
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).max(tgt_h as f64 / src_h as f64);
    let w = scaled(src_w, scale).max(tgt_w);
    let h = scaled(src_h, scale).max(tgt_h);
    (w, h)
}

/// Resized dimensions that fit entirely inside the target box.
///
/// Uniform scale `min(tw/sw, th/sh)`; results never exceed the target.
pub fn contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).min(tgt_h as f64 / src_h as f64);
    let w = scaled(src_w, scale).min(tgt_w);
    let h = scaled(src_h, scale).min(tgt_h);
    (w, h)
}

/// Offset that centres `inner` within `outer` (floored).
pub fn centre_offset(outer: (u32, u32), inner: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}

fn scaled(len: u32, scale: f64) -> u32 {
    ((len as f64 * scale).round() as u32).max(1)
}
