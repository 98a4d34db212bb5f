//! SHA-256 checksum utilities
//!
//! One canonical checksum format (`sha256:<hex>`) is used for content
//! fingerprints and for whole-file digests.

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

/// Prefix for all checksums produced by this module
pub const PREFIX: &str = "sha256:";

/// Checksum of raw bytes in the canonical `sha256:<hex>` format.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of string content in the canonical `sha256:<hex>` format.
pub fn compute_content_checksum(content: &str) -> String {
    compute_bytes_checksum(content.as_bytes())
}

/// Checksum of a file's contents.
///
/// Used to notice that the drawing changed on disk between load and save,
/// which happens when the CAD editor saves while a run is in progress.
pub fn compute_file_checksum(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    let content = std::fs::read(&native).map_err(|e| Error::io(&native, e))?;
    Ok(compute_bytes_checksum(&content))
}

/// Whether a string looks like a checksum produced by this module.
pub fn is_checksum(value: &str) -> bool {
    value
        .strip_prefix(PREFIX)
        .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}
