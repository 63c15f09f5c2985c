//! Which variants an upload gets, and at what size.
//!
//! Canonical boxes per archetype:
//!
//! | Type | small | medium | large |
//! |---|---|---|---|
//! | Thumbnail (16:9) | 320×180 | 640×360 | 1280×720 |
//! | Profile (1:1) | 88×88 | 256×256 | 512×512 |
//!
//! `small` is always the canonical box. `medium` and `large` adapt down to
//! the source's native box so a mid tier is never upscaled past the pixels
//! the upload actually has, and never drop below the tier before them.
//! Widths and heights are therefore non-decreasing small → medium → large.

use super::calculations::{adapt_tier, native_box};
use super::params::{FitMode, ImageType, OutputFormat, Quality, SizeCeiling, Tier, VariantSpec};
use image::{DynamicImage, GenericImageView};

/// Canonical `(width, height)` for a tier.
pub fn canonical_size(image_type: ImageType, tier: Tier) -> (u32, u32) {
    match (image_type, tier) {
        (ImageType::Thumbnail, Tier::Small) => (320, 180),
        (ImageType::Thumbnail, Tier::Medium) => (640, 360),
        (ImageType::Thumbnail, Tier::Large) => (1280, 720),
        (ImageType::Profile, Tier::Small) => (88, 88),
        (ImageType::Profile, Tier::Medium) => (256, 256),
        (ImageType::Profile, Tier::Large) => (512, 512),
    }
}

/// Compute specs from raw source dimensions.
///
/// Every spec is cover-fit JPEG at quality 85.
pub fn specs_for_dimensions(
    source: (u32, u32),
    ceiling: SizeCeiling,
    image_type: ImageType,
) -> Vec<VariantSpec> {
    let native = native_box(image_type, source);

    let mut specs = Vec::with_capacity(Tier::ALL.len());
    let mut previous: Option<(u32, u32)> = None;
    for tier in Tier::ALL {
        if !ceiling.includes(tier) {
            break;
        }
        let canonical = canonical_size(image_type, tier);
        let (width, height) = match previous {
            None => canonical,
            Some(floor) => adapt_tier(native, floor, canonical),
        };
        specs.push(VariantSpec {
            tier,
            width,
            height,
            mode: FitMode::Cover,
            format: OutputFormat::Jpeg,
            quality: Quality::default(),
        });
        previous = Some((width, height));
    }
    specs
}

/// Compute specs from a decoded (and already border-stripped) image.
pub fn build_specs(
    image: &DynamicImage,
    ceiling: SizeCeiling,
    image_type: ImageType,
) -> Vec<VariantSpec> {
    specs_for_dimensions(image.dimensions(), ceiling, image_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(specs: &[VariantSpec]) -> Vec<(&'static str, u32, u32)> {
        specs.iter().map(|s| (s.name(), s.width, s.height)).collect()
    }

    #[test]
    fn full_hd_thumbnail_gets_canonical_tiers() {
        let specs = specs_for_dimensions((1920, 1080), SizeCeiling::Large, ImageType::Thumbnail);
        assert_eq!(
            sizes(&specs),
            [("small", 320, 180), ("medium", 640, 360), ("large", 1280, 720)]
        );
        for spec in &specs {
            assert_eq!(spec.mode, FitMode::Cover);
            assert_eq!(spec.format, OutputFormat::Jpeg);
            assert_eq!(spec.quality.value(), 85);
        }
    }

    #[test]
    fn narrow_thumbnail_medium_uses_native_box() {
        let specs = specs_for_dimensions((626, 209), SizeCeiling::Medium, ImageType::Thumbnail);
        assert_eq!(sizes(&specs), [("small", 320, 180), ("medium", 372, 209)]);
    }

    #[test]
    fn small_profile_medium_uses_native_square() {
        let specs = specs_for_dimensions((209, 209), SizeCeiling::Medium, ImageType::Profile);
        assert_eq!(sizes(&specs), [("small", 88, 88), ("medium", 209, 209)]);
    }

    #[test]
    fn small_ceiling_emits_only_small() {
        let specs = specs_for_dimensions((4000, 3000), SizeCeiling::Small, ImageType::Profile);
        assert_eq!(sizes(&specs), [("small", 88, 88)]);
    }

    #[test]
    fn tiny_source_never_drops_below_small() {
        let specs = specs_for_dimensions((100, 50), SizeCeiling::Large, ImageType::Thumbnail);
        assert_eq!(
            sizes(&specs),
            [("small", 320, 180), ("medium", 320, 180), ("large", 320, 180)]
        );
    }

    #[test]
    fn large_adapts_between_medium_and_canonical() {
        // native 1000x562
        let specs = specs_for_dimensions((1000, 600), SizeCeiling::Large, ImageType::Thumbnail);
        assert_eq!(
            sizes(&specs),
            [("small", 320, 180), ("medium", 640, 360), ("large", 1000, 562)]
        );
    }

    #[test]
    fn large_does_not_upscale_adapted_medium() {
        let specs = specs_for_dimensions((300, 300), SizeCeiling::Large, ImageType::Profile);
        assert_eq!(
            sizes(&specs),
            [("small", 88, 88), ("medium", 256, 256), ("large", 300, 300)]
        );

        let specs = specs_for_dimensions((200, 240), SizeCeiling::Large, ImageType::Profile);
        assert_eq!(
            sizes(&specs),
            [("small", 88, 88), ("medium", 200, 200), ("large", 200, 200)]
        );
    }

    #[test]
    fn tiers_are_monotonic_across_many_sources() {
        for image_type in [ImageType::Thumbnail, ImageType::Profile] {
            for w in (1..3000).step_by(97) {
                for h in (1..3000).step_by(89) {
                    let specs = specs_for_dimensions((w, h), SizeCeiling::Large, image_type);
                    assert_eq!(specs.len(), 3);
                    for pair in specs.windows(2) {
                        assert!(
                            pair[0].width <= pair[1].width && pair[0].height <= pair[1].height,
                            "{image_type} {w}x{h}: {:?}",
                            sizes(&specs)
                        );
                    }
                    assert!(specs.iter().all(|s| s.width > 0 && s.height > 0));
                }
            }
        }
    }

    #[test]
    fn build_specs_reads_decoded_dimensions() {
        let img = DynamicImage::new_rgb8(626, 209);
        let specs = build_specs(&img, SizeCeiling::Medium, ImageType::Thumbnail);
        assert_eq!(specs[1].width, 372);
        assert_eq!(specs[1].height, 209);
    }
}
