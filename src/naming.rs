//! Stored file names for uploads.
//!
//! Every variant of one upload shares a single base name; only the tier
//! directory differs. The base name is `{stem}.{ext}` where the extension
//! comes from the sniffed MIME type:
//!
//! | MIME | Extension |
//! |---|---|
//! | `image/jpeg` | `jpg` |
//! | `image/png` | `png` |
//!
//! Anything else is rejected before it reaches the pipeline.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// The one MIME → extension table.
pub const MIME_EXTENSIONS: &[(&str, &str)] = &[("image/jpeg", "jpg"), ("image/png", "png")];

/// Hex characters of the content hash kept in a generated stem.
const STEM_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("Unrecognized image data")]
    Unrecognized,
    #[error("Unsupported MIME type: {0}")]
    UnsupportedMime(String),
}

/// Extension for an accepted MIME type.
pub fn extension_for_mime(mime: &str) -> Result<&'static str, NamingError> {
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| NamingError::UnsupportedMime(mime.to_string()))
}

/// MIME type sniffed from the leading magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Result<&'static str, NamingError> {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .map_err(|_| NamingError::Unrecognized)
}

/// Base name derived from the upload's content: `{sha256 prefix}.{ext}`.
///
/// Identical uploads map to the same name, so re-processing overwrites
/// rather than duplicating.
pub fn content_file_name(bytes: &[u8]) -> Result<String, NamingError> {
    let ext = extension_for_mime(sniff_mime(bytes)?)?;
    let digest = format!("{:x}", Sha256::digest(bytes));
    Ok(format!("{}.{}", &digest[..STEM_LEN], ext))
}
