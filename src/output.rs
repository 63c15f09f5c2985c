//! CLI output formatting.
//!
//! Every command prints a header line naming the upload, followed by one
//! indented line per tier. Formatting is split from printing so tests can
//! check the lines without capturing stdout.
//!
//! ## Process
//!
//! ```text
//! 3f9a…c2.jpg (thumbnail → sketches)
//!     small: 320x180 jpeg, 14.2 KiB → sketches/small/3f9a…c2.jpg
//!     medium: 372x209 jpeg, 31.0 KiB → sketches/medium/3f9a…c2.jpg
//! ```
//!
//! ## Plan
//!
//! ```text
//! upload.png (profile, 209x209 after border removal)
//!     small: 88x88 cover jpeg q85
//!     medium: 209x209 cover jpeg q85
//! ```

use crate::imaging::{FitMode, ImageType, VariantSpec};
use crate::pipeline::StoredVariant;
use serde::Serialize;

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn mode_label(mode: FitMode) -> &'static str {
    match mode {
        FitMode::Cover => "cover",
        FitMode::Contain => "contain",
    }
}

fn subtype(content_type: &str) -> &str {
    content_type.rsplit('/').next().unwrap_or(content_type)
}

pub fn format_process_output(
    file_name: &str,
    image_type: ImageType,
    prefix: &str,
    stored: &[StoredVariant],
) -> Vec<String> {
    let mut lines = vec![format!("{} ({} → {})", file_name, image_type, prefix)];
    for variant in stored {
        lines.push(format!(
            "    {}: {}x{} {}, {} → {}",
            variant.tier,
            variant.width,
            variant.height,
            subtype(variant.content_type),
            human_size(variant.size),
            variant.path
        ));
    }
    lines
}

pub fn format_plan_output(
    source_name: &str,
    image_type: ImageType,
    stripped: (u32, u32),
    specs: &[VariantSpec],
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {}x{} after border removal)",
        source_name, image_type, stripped.0, stripped.1
    )];
    for spec in specs {
        lines.push(format!(
            "    {}: {}x{} {} {} q{}",
            spec.tier,
            spec.width,
            spec.height,
            mode_label(spec.mode),
            spec.format,
            spec.quality.value()
        ));
    }
    lines
}

/// Stores treat a missing path as deleted, so the paths are listed as
/// removed if present rather than as confirmed deletions.
pub fn format_delete_output(prefix: &str, paths: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Removed under {} (if present)", prefix)];
    lines.extend(paths.iter().map(|p| format!("    {}", p)));
    lines
}

/// Machine-readable report of a process run.
#[derive(Debug, Serialize)]
pub struct ProcessReport<'a> {
    pub file_name: &'a str,
    pub image_type: ImageType,
    pub prefix: &'a str,
    pub variants: &'a [StoredVariant],
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
