//! # Sketchbook Variants
//!
//! The image side of the sketch-comedy database: every uploaded sketch
//! thumbnail or cast profile photo is turned into a fixed set of cropped,
//! resized and encoded size variants, ready for a store that serves them.
//!
//! # Architecture: One Pipeline, Pluggable Storage
//!
//! ```text
//! upload bytes → decode → strip border → plan tiers → (cover|contain → encode) per tier → Store
//! ```
//!
//! - **Deterministic**: the same bytes with the same ceiling and type always
//!   produce byte-identical variants at the same paths.
//! - **Stateless**: each run owns its raster and spec list, so runs for
//!   different uploads can execute concurrently without coordination.
//! - **Storage-agnostic**: the pipeline only needs [`store::Store`]'s
//!   `save` and `delete`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pixel work: border removal, cover/contain, encoding, tier sizing |
//! | [`pipeline`] | Orchestration: decode → strip → plan → render → save, and deletion |
//! | [`store`] | The `Store` trait plus local-disk and in-memory implementations |
//! | [`naming`] | MIME sniffing, the MIME → extension table, content-derived file names |
//! | [`config`] | `variants.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Archetypes, Three Tiers
//!
//! Uploads are either 16:9 sketch thumbnails or 1:1 profile photos, and get
//! a `small` variant always plus `medium`/`large` up to a caller-chosen
//! ceiling. Mid tiers shrink to the source's native box rather than
//! upscale, but never below the tier before them.
//!
//! ## Median Border Detection
//!
//! Letterboxing is estimated from the corners with a median, not a mean,
//! so a single bright pixel in one corner cannot shift the border level.
//! A source with no detectable border passes through untouched.
//!
//! ## Storage Layout
//!
//! Variants live at `{prefix}/{tier}/{file_name}`. All tiers of one upload
//! share a file name; deleting an upload deletes all three tier paths
//! whether or not they were generated.
//!
//! ## Partial Writes
//!
//! A failed save aborts the run but keeps what was already saved. Rolling
//! back is the caller's decision, via [`pipeline::delete_variants`].

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod store;

pub use pipeline::{PipelineError, delete_variants, run_pipeline, run_pipeline_with};
pub use store::{FsStore, MemoryStore, Store, StoreError};

#[cfg(test)]
pub(crate) mod test_helpers;
