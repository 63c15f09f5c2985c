//! Pipeline configuration.
//!
//! The library runs with fixed policy constants (border tolerance 15,
//! safety margin 2, quality 85, sequential rendering). Those are the
//! defaults of [`PipelineConfig`]; the CLI can override them from a
//! `variants.toml`:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [border]
//! tolerance = 15       # Max gray deviation still treated as border (0-255)
//! safety_margin = 2    # Pixels trimmed inside the detected content box
//!
//! [encoding]
//! quality = 85         # JPEG quality (1-100, <= 0 means default)
//!
//! [processing]
//! parallel = false     # Render tiers concurrently (saves stay in order)
//! max_threads = 4      # Worker cap when parallel (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse; unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a pipeline run can be tuned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Border detection settings.
    pub border: BorderConfig,
    /// Encoder settings.
    pub encoding: EncodingConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encoding.quality > 100 {
            return Err(ConfigError::Validation(
                "encoding.quality must be at most 100".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Quality to stamp on every spec.
    pub fn quality(&self) -> Quality {
        Quality::new(self.encoding.quality)
    }
}

/// Border detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    /// Gray-level deviation from the corner median still counted as border.
    pub tolerance: u8,
    /// Pixels pulled in from each side of the detected content box.
    pub safety_margin: u32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            tolerance: 15,
            safety_margin: 2,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    pub quality: i32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Render the tiers of one upload concurrently.
    pub parallel: bool,
    /// Maximum number of rendering threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `variants.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sketchbook Variants Configuration
# =================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Border removal
# ---------------------------------------------------------------------------
[border]
# Gray-level distance from the corner median still treated as border.
# Raise it for noisy scans, lower it for subtle letterboxing.
tolerance = 15

# Pixels trimmed inside the detected content box to drop anti-aliased edges.
safety_margin = 2

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# JPEG quality (1 = worst, 100 = best). Zero or negative means 85.
quality = 85

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Render small/medium/large concurrently. Saves still happen in tier order.
parallel = false

# Maximum worker threads when parallel. Omit for one per CPU core.
# max_threads = 4
"##
}
