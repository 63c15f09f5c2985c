//! Image processing: pure Rust, in memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Border removal** | corner-median gray level + `crop_imm` |
//! | **Cover / contain** | `resize_exact` (Catmull-Rom) + `crop_imm` / `overlay` |
//! | **Encode** | `JpegEncoder` / `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing variants
//! - **Variants**: Which tiers an upload gets and at what size
//! - **Border / Resample / Encode**: the pixel work, one new raster per step

pub mod border;
mod calculations;
pub mod encode;
mod params;
pub mod resample;
pub mod variants;

use thiserror::Error;

pub use border::{median, remove_borders};
pub use calculations::{adapt_tier, native_box};
pub use encode::{EncodedImage, encode};
pub use params::{
    DEFAULT_QUALITY, FitMode, ImageType, OutputFormat, Quality, SizeCeiling, Tier, Variant,
    VariantSpec,
};
pub use resample::{contain, cover};
pub use variants::{build_specs, canonical_size, specs_for_dimensions};

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("output format {0} is not implemented")]
    UnsupportedFormat(OutputFormat),
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
