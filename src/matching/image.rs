//! Container image reference parsing.
//!
//! Accepts the usual `registry/repository[:tag][@digest]` grammar, with the
//! registry defaulting to Docker Hub the same way container tooling does.

use crate::error::{IdentifierErrorKind, Result, VexError};
use oci_distribution::Reference;

/// Parse `s` as a container image reference.
pub fn parse_image_reference(s: &str) -> Result<Reference> {
    s.parse::<Reference>().map_err(|e| {
        VexError::identifier(
            "parsing image reference",
            IdentifierErrorKind::InvalidImageReference {
                reference: s.to_string(),
                reason: e.to_string(),
            },
        )
    })
}

/// True if `s` parses as a container image reference.
#[must_use]
pub fn is_image_reference(s: &str) -> bool {
    !s.trim().is_empty() && s.parse::<Reference>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_references() {
        assert!(is_image_reference("alpine"));
        assert!(is_image_reference("alpine:3.19"));
        assert!(is_image_reference("ghcr.io/example/app:1.2.3"));
        assert!(is_image_reference("localhost:5000/team/app"));
        assert!(is_image_reference(
            "registry.example.com/ns/app@sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        ));
    }

    #[test]
    fn test_invalid_references() {
        assert!(!is_image_reference(""));
        assert!(!is_image_reference("Not An Image"));
        assert!(!is_image_reference("app:tag:extra"));
        assert!(!is_image_reference("https://example.com/app"));
    }

    #[test]
    fn test_parse_reports_offending_string() {
        match parse_image_reference("bad ref") {
            Err(VexError::Identifier {
                source: IdentifierErrorKind::InvalidImageReference { reference, .. },
                ..
            }) => assert_eq!(reference, "bad ref"),
            other => panic!("expected InvalidImageReference, got {other:?}"),
        }
    }

    #[test]
    fn test_parsed_parts() {
        let reference = parse_image_reference("ghcr.io/example/app:1.2.3").expect("valid");
        assert_eq!(reference.registry(), "ghcr.io");
        assert_eq!(reference.repository(), "example/app");
        assert_eq!(reference.tag(), Some("1.2.3"));
    }
}
