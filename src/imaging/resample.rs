//! Geometric fit transforms: cover (fill + centre crop) and contain
//! (fit + centre pad).
//!
//! Both resize with Catmull-Rom and return a new raster of exactly the
//! requested size. Crops are direct pixel copies, never a second resample.

use super::ImagingError;
use super::calculations::{centre_offset, contain_dimensions, cover_dimensions};
use super::params::OutputFormat;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Resampling filter for every variant.
pub const FILTER: FilterType = FilterType::CatmullRom;

fn check_dimensions(src: &DynamicImage, width: u32, height: u32) -> Result<(), ImagingError> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ImagingError::InvalidDimensions {
            width: src_w,
            height: src_h,
        });
    }
    if width == 0 || height == 0 {
        return Err(ImagingError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Scale to fill `width`×`height`, then centre-crop the overflow.
pub fn cover(src: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, ImagingError> {
    check_dimensions(src, width, height)?;

    let (rw, rh) = cover_dimensions(src.dimensions(), (width, height));
    let resized = src.resize_exact(rw, rh, FILTER);
    let (x, y) = centre_offset((rw, rh), (width, height));
    Ok(resized.crop_imm(x, y, width, height))
}

/// Scale to fit inside `width`×`height`, then centre on a canvas of exactly
/// that size.
///
/// JPEG has no alpha, so its canvas is opaque black; other formats start
/// fully transparent.
pub fn contain(
    src: &DynamicImage,
    width: u32,
    height: u32,
    format: OutputFormat,
) -> Result<DynamicImage, ImagingError> {
    check_dimensions(src, width, height)?;

    let (rw, rh) = contain_dimensions(src.dimensions(), (width, height));
    let resized = src.resize_exact(rw, rh, FILTER).to_rgba8();

    let fill = if format.has_alpha() {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba([0, 0, 0, 255])
    };
    let mut canvas = RgbaImage::from_pixel(width, height, fill);
    let (x, y) = centre_offset((width, height), (rw, rh));
    imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
    Ok(DynamicImage::ImageRgba8(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, solid_image};
    use image::Rgb;

    #[test]
    fn cover_produces_exact_dimensions() {
        let src = gradient_image(800, 600);
        for (w, h) in [(320, 180), (88, 88), (400, 500), (1280, 720)] {
            let out = cover(&src, w, h).unwrap();
            assert_eq!(out.dimensions(), (w, h), "cover to {w}x{h}");
        }
    }

    #[test]
    fn cover_never_pads() {
        // Solid red source: any canvas fill would show up as non-red
        let src = solid_image(300, 100, Rgb([255, 0, 0]));
        let out = cover(&src, 64, 64).unwrap().to_rgb8();
        for pixel in out.pixels() {
            assert!(pixel[0] > 240 && pixel[1] < 15 && pixel[2] < 15, "{pixel:?}");
        }
    }

    #[test]
    fn cover_crops_from_centre() {
        // Left half black, right half white, 200x100 → 100x100 keeps the middle
        let src = DynamicImage::ImageRgb8(image::RgbImage::from_fn(200, 100, |x, _| {
            if x < 100 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let out = cover(&src, 100, 100).unwrap().to_rgb8();
        assert!(out.get_pixel(5, 50)[0] < 20);
        assert!(out.get_pixel(94, 50)[0] > 235);
    }

    #[test]
    fn contain_produces_exact_dimensions() {
        let src = gradient_image(300, 900);
        for (w, h) in [(320, 180), (88, 88), (512, 512)] {
            let out = contain(&src, w, h, OutputFormat::Jpeg).unwrap();
            assert_eq!(out.dimensions(), (w, h), "contain to {w}x{h}");
        }
    }

    #[test]
    fn contain_jpeg_pads_with_opaque_black() {
        // 200x100 white into 100x100: content 100x50 at y 25..75
        let src = solid_image(200, 100, Rgb([255, 255, 255]));
        let out = contain(&src, 100, 100, OutputFormat::Jpeg).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(50, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(50, 99), &Rgba([0, 0, 0, 255]));
        let centre = out.get_pixel(50, 50);
        assert!(centre[0] >= 250 && centre[3] >= 250, "{centre:?}");
    }

    #[test]
    fn contain_png_pads_with_transparency() {
        let src = solid_image(100, 200, Rgb([255, 255, 255]));
        let out = contain(&src, 100, 100, OutputFormat::Png).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(0, 50)[3], 0);
        assert_eq!(out.get_pixel(50, 50)[3], 255);
    }

    #[test]
    fn contain_never_crops() {
        // A bright 1px frame around the source must survive the fit
        let src = DynamicImage::ImageRgb8(image::RgbImage::from_fn(100, 50, |x, y| {
            if x == 0 || y == 0 || x == 99 || y == 49 {
                Rgb([255, 255, 255])
            } else {
                Rgb([60, 60, 60])
            }
        }));
        let out = contain(&src, 100, 100, OutputFormat::Jpeg).unwrap().to_rgb8();
        // Content occupies rows 25..75; its top edge stays bright
        assert!(out.get_pixel(50, 25)[0] > 150);
        assert!(out.get_pixel(50, 74)[0] > 150);
    }

    #[test]
    fn zero_area_source_is_rejected() {
        let src = DynamicImage::new_rgb8(0, 10);
        assert!(matches!(
            cover(&src, 10, 10),
            Err(ImagingError::InvalidDimensions { width: 0, .. })
        ));
        assert!(contain(&src, 10, 10, OutputFormat::Png).is_err());
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = gradient_image(10, 10);
        assert!(matches!(
            cover(&src, 0, 10),
            Err(ImagingError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn source_is_not_mutated() {
        let src = gradient_image(64, 64);
        let before = src.clone();
        cover(&src, 10, 20).unwrap();
        contain(&src, 20, 10, OutputFormat::Jpeg).unwrap();
        assert_eq!(src, before);
    }
}
