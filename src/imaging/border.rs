//! Letterbox / solid border detection and removal.
//!
//! The border colour is estimated from 5×5 swatches in the four corners.
//! Gray values are `(r + g + b) / 3` on 8-bit channels and the border level
//! is their **median**, so one stray corner pixel cannot drag the estimate.
//! Every pixel whose gray value differs from that level by more than the
//! tolerance counts as content; the image is cropped to the content bounding
//! box, pulled in by a small safety margin to drop anti-aliased edges.
//! The margin only applies to sides where a border was actually found, so
//! stripping an already stripped image is a no-op.
//!
//! Removal never fails: a uniform image, or one with no detectable border,
//! comes back unchanged.

use image::{DynamicImage, GenericImageView, RgbImage};
use log::{debug, warn};

/// Side of the square swatch sampled in each corner.
const SWATCH: u32 = 5;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Pull every side that is inset from the image edge in by `margin`.
    ///
    /// Sides already touching the edge of a `width`×`height` image carry no
    /// border and stay put. An axis that would collapse keeps its unshrunk
    /// extent, so the result is never empty.
    pub fn inset(self, margin: u32, width: u32, height: u32) -> Self {
        let (min_x, max_x) = inset_axis(self.min_x, self.max_x, width, margin)
            .unwrap_or((self.min_x, self.max_x));
        let (min_y, max_y) = inset_axis(self.min_y, self.max_y, height, margin)
            .unwrap_or((self.min_y, self.max_y));
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Whether `margin` would empty either axis of this box.
    pub fn collapses(&self, margin: u32, width: u32, height: u32) -> bool {
        inset_axis(self.min_x, self.max_x, width, margin).is_none()
            || inset_axis(self.min_y, self.max_y, height, margin).is_none()
    }

    /// Whether the box covers the whole `width`×`height` image.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        self.min_x == 0 && self.min_y == 0 && self.max_x + 1 == width && self.max_y + 1 == height
    }
}

/// `None` when the trimmed range would be empty.
fn inset_axis(min: u32, max: u32, extent: u32, margin: u32) -> Option<(u32, u32)> {
    let lo = if min > 0 { min.saturating_add(margin) } else { min };
    let hi = if max + 1 < extent {
        max.saturating_sub(margin)
    } else {
        max
    };
    (lo <= hi).then_some((lo, hi))
}

/// Average-of-channels gray value.
#[inline]
pub fn gray(pixel: &image::Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Median of `values` via quickselect on a private copy.
///
/// Even-length input yields the lower of the two middle elements. Returns
/// `None` for an empty slice.
pub fn median(values: &[u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let mut scratch = values.to_vec();
    let k = (scratch.len() - 1) / 2;
    Some(select(&mut scratch, k))
}

/// k-th smallest element (0-based) of a non-empty slice, reordering it.
fn select(values: &mut [u8], k: usize) -> u8 {
    if values.len() == 1 {
        return values[0];
    }
    let pivot = values[values.len() / 2];
    let (lt, gt) = partition(values, pivot);
    if k < lt {
        select(&mut values[..lt], k)
    } else if k < gt {
        pivot
    } else {
        select(&mut values[gt..], k - gt)
    }
}

/// Three-way partition around `pivot`.
///
/// Afterwards `[..lt]` is below, `[lt..gt]` equal to and `[gt..]` above the
/// pivot.
fn partition(values: &mut [u8], pivot: u8) -> (usize, usize) {
    let (mut lt, mut i, mut gt) = (0, 0, values.len());
    while i < gt {
        if values[i] < pivot {
            values.swap(lt, i);
            lt += 1;
            i += 1;
        } else if values[i] > pivot {
            gt -= 1;
            values.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

/// Gray samples from the four corner swatches (clamped to the image).
fn corner_samples(rgb: &RgbImage) -> Vec<u8> {
    let (w, h) = rgb.dimensions();
    let sw = SWATCH.min(w);
    let sh = SWATCH.min(h);
    let origins = [(0, 0), (w - sw, 0), (0, h - sh), (w - sw, h - sh)];

    let mut samples = Vec::with_capacity((4 * sw * sh) as usize);
    for (ox, oy) in origins {
        for y in oy..oy + sh {
            for x in ox..ox + sw {
                samples.push(gray(rgb.get_pixel(x, y)));
            }
        }
    }
    samples
}

/// Bounding box of every pixel deviating from `level` by more than
/// `tolerance`, or `None` when nothing does.
pub fn content_bounds(rgb: &RgbImage, level: u8, tolerance: u8) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    for (x, y, pixel) in rgb.enumerate_pixels() {
        if gray(pixel).abs_diff(level) <= tolerance {
            continue;
        }
        bounds = Some(match bounds {
            None => BoundingBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }
    bounds
}

/// Strip a near-uniform border from `image`.
///
/// Returns a new raster cropped to the detected content (minus
/// `safety_margin` on each side that had a border), or a clone of the input
/// when the image is empty, has no pixel outside `tolerance` of the corner
/// median, or has content reaching every edge.
pub fn remove_borders(image: &DynamicImage, tolerance: u8, safety_margin: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return image.clone();
    }

    let rgb = image.to_rgb8();
    let samples = corner_samples(&rgb);
    let Some(level) = median(&samples) else {
        return image.clone();
    };

    let Some(content) = content_bounds(&rgb, level, tolerance) else {
        debug!("no content outside border level {level} (tolerance {tolerance}), keeping {w}x{h}");
        return image.clone();
    };

    if safety_margin > 0 && content.collapses(safety_margin, w, h) {
        warn!(
            "safety margin {safety_margin} would empty {}x{} content box, cropping without it",
            content.width(),
            content.height()
        );
    }
    let cropped = content.inset(safety_margin, w, h);
    if cropped.is_full(w, h) {
        debug!("content reaches every edge at border level {level}, keeping {w}x{h}");
        return image.clone();
    }

    debug!(
        "border level {level}: {w}x{h} -> {}x{} at ({}, {})",
        cropped.width(),
        cropped.height(),
        cropped.min_x,
        cropped.min_y
    );
    image.crop_imm(
        cropped.min_x,
        cropped.min_y,
        cropped.width(),
        cropped.height(),
    )
}
