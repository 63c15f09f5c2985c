//! Parameter types for variant generation.
//!
//! These types describe *what* to produce, not *how*. The
//! [`variants`](super::variants) module decides which [`VariantSpec`]s an
//! upload gets; [`resample`](super::resample) and [`encode`](super::encode)
//! do the pixel work for each one.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Non-positive input falls back to the default.
//! - [`ImageType`]: Upload archetype, a 16:9 thumbnail or a 1:1 profile photo.
//! - [`Tier`] / [`SizeCeiling`]: Named size tiers and the highest tier a run may produce.
//! - [`FitMode`]: Cover (fill + crop) or contain (fit + pad).
//! - [`OutputFormat`]: Encoded format with its content type.
//! - [`VariantSpec`] / [`Variant`]: One planned rendition and its encoded result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality applied when a spec carries no usable value.
pub const DEFAULT_QUALITY: u8 = 85;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quality(u8);

impl Quality {
    /// Values `<= 0` mean "unset" and become [`DEFAULT_QUALITY`]; values
    /// above 100 are clamped.
    pub fn new(value: i32) -> Self {
        if value <= 0 {
            Self(DEFAULT_QUALITY)
        } else {
            Self(value.min(100) as u8)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// The two upload archetypes the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Square profile photo.
    Profile,
    /// 16:9 sketch thumbnail.
    Thumbnail,
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageType::Profile => write!(f, "profile"),
            ImageType::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// A named size tier. The name doubles as the storage sub-directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    /// Every tier, smallest first.
    pub const ALL: [Tier; 3] = [Tier::Small, Tier::Medium, Tier::Large];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Large => "large",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Highest tier a pipeline run is allowed to produce.
///
/// `small` is always produced; `medium` and `large` only when the ceiling
/// reaches them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SizeCeiling {
    Small,
    Medium,
    Large,
}

impl SizeCeiling {
    /// Whether `tier` is at or below this ceiling.
    pub fn includes(self, tier: Tier) -> bool {
        let top = match self {
            SizeCeiling::Small => Tier::Small,
            SizeCeiling::Medium => Tier::Medium,
            SizeCeiling::Large => Tier::Large,
        };
        tier <= top
    }
}

/// How a source is fitted into the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fill, centre-crop the overflow. Never pads.
    Cover,
    /// Scale to fit, pad the remainder. Never crops.
    Contain,
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    /// Declared so callers can name it; encoding always fails until an
    /// encoder is wired in.
    WebP,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Whether the encoded output can carry transparency.
    pub fn has_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::WebP => write!(f, "webp"),
        }
    }
}

/// Full specification for one variant: tier, exact box, fit and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantSpec {
    pub tier: Tier,
    pub width: u32,
    pub height: u32,
    pub mode: FitMode,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl VariantSpec {
    pub fn name(&self) -> &'static str {
        self.tier.name()
    }
}

/// One encoded rendition, ready to hand to a store.
#[derive(Clone, PartialEq, Eq)]
pub struct Variant {
    pub tier: Tier,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        self.tier.name()
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("tier", &self.tier)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(1).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_non_positive_falls_back_to_default() {
        assert_eq!(Quality::new(0).value(), 85);
        assert_eq!(Quality::new(-20).value(), 85);
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn ceiling_includes_tiers_up_to_itself() {
        assert!(SizeCeiling::Small.includes(Tier::Small));
        assert!(!SizeCeiling::Small.includes(Tier::Medium));
        assert!(SizeCeiling::Medium.includes(Tier::Medium));
        assert!(!SizeCeiling::Medium.includes(Tier::Large));
        assert!(Tier::ALL.iter().all(|&t| SizeCeiling::Large.includes(t)));
    }

    #[test]
    fn tier_names_match_storage_directories() {
        let names: Vec<&str> = Tier::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["small", "medium", "large"]);
    }

    #[test]
    fn content_types() {
        assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
        assert_eq!(OutputFormat::WebP.content_type(), "image/webp");
        assert!(!OutputFormat::Jpeg.has_alpha());
        assert!(OutputFormat::Png.has_alpha());
    }
}
