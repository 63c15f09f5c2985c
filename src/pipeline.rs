//! Upload → stored variants.
//!
//! One run, strictly in order:
//!
//! ```text
//! bytes ─decode─▶ raster ─strip borders─▶ raster ─build specs─▶ [small, medium?, large?]
//!                                                   │
//!                      for each spec: resample ─▶ encode ─▶ store.save("{prefix}/{tier}/{file}")
//! ```
//!
//! ## Failure semantics
//!
//! Any error aborts the run and is returned as-is; nothing is retried.
//! Variants saved before the failure stay saved. Callers wanting
//! all-or-nothing call [`delete_variants`] as compensation.
//!
//! ## Parallel rendering
//!
//! With `processing.parallel` the tiers are resampled and encoded on the
//! rayon pool, but results are still saved in tier order and the first
//! error *in tier order* is the one returned, so callers observe the same
//! partial-write behaviour as a sequential run.

use crate::config::PipelineConfig;
use crate::imaging::{
    FitMode, ImageType, ImagingError, SizeCeiling, Tier, Variant, VariantSpec, build_specs,
    contain, cover, encode, remove_borders,
};
use crate::store::{Store, StoreError};
use image::{DynamicImage, GenericImageView};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A variant that made it into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredVariant {
    pub tier: Tier,
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
    pub size: usize,
}

/// Storage path of one variant: `{prefix}/{tier}/{file_name}`.
pub fn variant_path(prefix: &str, tier: Tier, file_name: &str) -> String {
    format!("{}/{}/{}", prefix, tier.name(), file_name)
}

/// Decode upload bytes into a raster.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(PipelineError::Decode)
}

/// Decode and strip borders.
pub fn prepare(bytes: &[u8], config: &PipelineConfig) -> Result<DynamicImage> {
    let decoded = decode(bytes)?;
    let (w, h) = decoded.dimensions();
    let stripped = remove_borders(
        &decoded,
        config.border.tolerance,
        config.border.safety_margin,
    );
    let (sw, sh) = stripped.dimensions();
    if (sw, sh) != (w, h) {
        debug!("stripped border: {w}x{h} -> {sw}x{sh}");
    }
    Ok(stripped)
}

/// Specs a run would produce for these bytes, without encoding anything.
pub fn plan(
    bytes: &[u8],
    ceiling: SizeCeiling,
    image_type: ImageType,
    config: &PipelineConfig,
) -> Result<Vec<VariantSpec>> {
    let image = prepare(bytes, config)?;
    Ok(plan_image(&image, ceiling, image_type, config))
}

/// Specs for an already prepared raster, with the configured quality.
pub fn plan_image(
    image: &DynamicImage,
    ceiling: SizeCeiling,
    image_type: ImageType,
    config: &PipelineConfig,
) -> Vec<VariantSpec> {
    let quality = config.quality();
    build_specs(image, ceiling, image_type)
        .into_iter()
        .map(|spec| VariantSpec { quality, ..spec })
        .collect()
}

/// Resample and encode one spec.
pub fn render_variant(image: &DynamicImage, spec: &VariantSpec) -> Result<Variant> {
    if spec.width == 0 || spec.height == 0 {
        return Err(ImagingError::InvalidDimensions {
            width: spec.width,
            height: spec.height,
        }
        .into());
    }

    let fitted = match spec.mode {
        FitMode::Cover => cover(image, spec.width, spec.height)?,
        FitMode::Contain => contain(image, spec.width, spec.height, spec.format)?,
    };
    let encoded = encode(&fitted, spec.format, spec.quality)?;
    debug!(
        "rendered {} {}x{} {} q{}: {} bytes",
        spec.name(),
        spec.width,
        spec.height,
        spec.format,
        spec.quality.value(),
        encoded.bytes.len()
    );

    Ok(Variant {
        tier: spec.tier,
        content_type: encoded.content_type,
        bytes: encoded.bytes,
    })
}

/// Render every spec concurrently, keeping spec order in the output.
fn render_parallel(image: &DynamicImage, specs: &[VariantSpec]) -> Vec<Result<Variant>> {
    specs
        .par_iter()
        .map(|spec| render_variant(image, spec))
        .collect()
}

/// Decode, strip and render all variants without storing them.
pub fn render_variants(
    bytes: &[u8],
    ceiling: SizeCeiling,
    image_type: ImageType,
    config: &PipelineConfig,
) -> Result<Vec<Variant>> {
    let image = prepare(bytes, config)?;
    let specs = plan_image(&image, ceiling, image_type, config);
    if config.processing.parallel {
        render_parallel(&image, &specs).into_iter().collect()
    } else {
        specs.iter().map(|spec| render_variant(&image, spec)).collect()
    }
}

fn save_variant<S: Store + ?Sized>(
    store: &S,
    prefix: &str,
    file_name: &str,
    spec: &VariantSpec,
    variant: Variant,
) -> Result<StoredVariant> {
    let path = variant_path(prefix, variant.tier, file_name);
    store.save(&path, &variant.bytes)?;
    debug!("saved {path} ({} bytes)", variant.bytes.len());
    Ok(StoredVariant {
        tier: variant.tier,
        path,
        width: spec.width,
        height: spec.height,
        content_type: variant.content_type,
        size: variant.bytes.len(),
    })
}

/// Run the pipeline with the fixed policy constants.
pub fn run_pipeline<S: Store + ?Sized>(
    source: &[u8],
    ceiling: SizeCeiling,
    image_type: ImageType,
    file_name: &str,
    prefix: &str,
    store: &S,
) -> Result<Vec<StoredVariant>> {
    run_pipeline_with(
        source,
        ceiling,
        image_type,
        file_name,
        prefix,
        store,
        &PipelineConfig::default(),
    )
}

/// Run the pipeline with an explicit configuration.
///
/// Returns the stored variants in tier order.
pub fn run_pipeline_with<S: Store + ?Sized>(
    source: &[u8],
    ceiling: SizeCeiling,
    image_type: ImageType,
    file_name: &str,
    prefix: &str,
    store: &S,
    config: &PipelineConfig,
) -> Result<Vec<StoredVariant>> {
    let image = prepare(source, config)?;
    let specs = plan_image(&image, ceiling, image_type, config);

    let mut stored = Vec::with_capacity(specs.len());
    if config.processing.parallel {
        let rendered = render_parallel(&image, &specs);
        for (spec, variant) in specs.iter().zip(rendered) {
            stored.push(save_variant(store, prefix, file_name, spec, variant?)?);
        }
    } else {
        for spec in &specs {
            let variant = render_variant(&image, spec)?;
            stored.push(save_variant(store, prefix, file_name, spec, variant)?);
        }
    }

    info!(
        "stored {} {image_type} variant(s) of {file_name} under {prefix}",
        stored.len()
    );
    Ok(stored)
}

/// Delete every tier of `file_name`, whether or not it was ever generated.
pub fn delete_variants<S: Store + ?Sized>(store: &S, prefix: &str, file_name: &str) -> Result<()> {
    for tier in Tier::ALL {
        store.delete(&variant_path(prefix, tier, file_name))?;
    }
    info!("deleted variants of {file_name} under {prefix}");
    Ok(())
}
