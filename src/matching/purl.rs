//! Product identifier normalization.
//!
//! Splits product references into the three groups attestation cares about:
//!
//! - **image refs**: container images, including `pkg:oci/` purls decoded
//!   back into `registry/repository[@digest|:tag]` form
//! - **other refs**: non-image packages that carry a hash, and anything that
//!   is neither a purl nor an image reference
//! - **unattestable refs**: purls without a hash, which cannot be bound to a
//!   signed subject

use super::image::is_image_reference;
use super::index::ProductRef;
use crate::error::{Result, VexError};
use crate::model::HashAlgorithm;
use packageurl::PackageUrl;
use serde::Serialize;
use std::str::FromStr;

const OCI_PURL_PREFIX: &str = "pkg:oci/";

// Some tools emit a stray slash after the scheme.
const BROKEN_OCI_PURL_PREFIX: &str = "pkg:/oci/";

/// Product references partitioned by how they can be attested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedProducts {
    pub image_refs: Vec<ProductRef>,
    pub other_refs: Vec<ProductRef>,
    pub unattestable_refs: Vec<ProductRef>,
}

impl NormalizedProducts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image_refs.is_empty() && self.other_refs.is_empty() && self.unattestable_refs.is_empty()
    }
}

/// Classify product references, preserving input order within each group.
///
/// Any malformed OCI purl aborts the whole batch.
pub fn normalize_products(subjects: Vec<ProductRef>) -> Result<NormalizedProducts> {
    let mut normalized = NormalizedProducts::default();

    for mut pref in subjects {
        if is_oci_purl(&pref.name) {
            let (reference, digest) = oci_purl_to_reference(&pref.name)?;
            tracing::debug!("{} is a purl for {}", pref.name, reference);
            if let Some((algorithm, value)) = digest {
                pref.hashes.insert(algorithm, value);
            }
            pref.name = reference;
            normalized.image_refs.push(pref);
        } else if pref.name.starts_with("pkg:") {
            if pref.hashes.is_empty() {
                normalized.unattestable_refs.push(pref);
            } else {
                normalized.other_refs.push(pref);
            }
        } else if is_image_reference(&pref.name) {
            normalized.image_refs.push(pref);
        } else {
            normalized.other_refs.push(pref);
        }
    }

    Ok(normalized)
}

fn is_oci_purl(name: &str) -> bool {
    name.starts_with(OCI_PURL_PREFIX) || name.starts_with(BROKEN_OCI_PURL_PREFIX)
}

/// Decode an OCI purl into an image reference and the digest it pins, if any.
///
/// `repository_url` becomes the registry/namespace prefix. A version holding
/// `algorithm:hex` is appended as `@digest`; otherwise a `tag` qualifier is
/// appended as `:tag`.
pub fn oci_purl_to_reference(name: &str) -> Result<(String, Option<(HashAlgorithm, String)>)> {
    let repaired = name
        .strip_prefix(BROKEN_OCI_PURL_PREFIX)
        .map_or_else(|| name.to_string(), |rest| format!("{OCI_PURL_PREFIX}{rest}"));

    let purl = PackageUrl::from_str(&repaired)
        .map_err(|e| VexError::invalid_purl(name, e.to_string()))?;

    let qualifiers = purl.qualifiers();
    let mut reference = match qualifiers.get("repository_url") {
        Some(repository) => format!("{}/{}", repository.trim_end_matches('/'), purl.name()),
        None => purl.name().to_string(),
    };

    let mut digest = None;
    if let Some(version) = purl.version().filter(|v| !v.is_empty()) {
        reference.push('@');
        reference.push_str(version);
        if let Some((algorithm, value)) = version.split_once(':') {
            digest = digest_algorithm(algorithm).map(|algo| (algo, value.to_string()));
        }
    } else if let Some(tag) = qualifiers.get("tag") {
        reference.push(':');
        reference.push_str(tag);
    }

    Ok((reference, digest))
}

/// Hash algorithm for a digest prefix found in an OCI purl version.
///
/// `sha512` maps to SHA3-512 to stay compatible with documents and
/// attestations produced by existing OpenVEX tooling.
fn digest_algorithm(prefix: &str) -> Option<HashAlgorithm> {
    match prefix {
        "sha256" => Some(HashAlgorithm::Sha256),
        "sha512" => Some(HashAlgorithm::Sha3_512),
        _ => None,
    }
}
