//! Classification of VEX source locations.

use crate::error::{Result, VexError};
use crate::matching::is_image_reference;
use std::fmt;
use std::path::Path;

/// Where a VEX document can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// A document on the local filesystem
    File,
    /// Attestations attached to a container image in a registry
    Image,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Decide whether `uri` points at a local file or a container image.
///
/// Existing paths win over image references, so a file named like an image
/// (`alpine`) is still read from disk.
pub fn source_type(uri: &str) -> Result<SourceType> {
    if Path::new(uri).exists() {
        return Ok(SourceType::File);
    }
    if is_image_reference(uri) {
        return Ok(SourceType::Image);
    }
    Err(VexError::validation(format!(
        "unable to resolve the vex source location: {uri}"
    )))
}
