//! Deriving attestation subjects from a document's products.

use super::types::Subject;
use crate::error::{AttestationErrorKind, Result, VexError};
use crate::matching::{
    is_image_reference, list_document_products, normalize_products, parse_image_reference,
    ProductRef,
};
use crate::model::{HashAlgorithm, Hashes, VexDocument};
use std::collections::BTreeMap;

/// Looks up the content digest of a container image.
///
/// Registry lookups live behind this trait so subject derivation stays free
/// of network access.
pub trait DigestResolver {
    /// Digests for `reference`. An empty map means the digest is unknown.
    fn resolve(&self, reference: &str) -> Result<Hashes>;
}

/// Resolves digests from a fixed table, falling back to a digest pinned in
/// the reference itself (`repo@sha256:...`).
#[derive(Debug, Clone, Default)]
pub struct KnownDigestResolver {
    known: BTreeMap<String, Hashes>,
}

impl KnownDigestResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a digest for `reference`.
    #[must_use]
    pub fn with_digest(
        mut self,
        reference: impl Into<String>,
        algorithm: HashAlgorithm,
        value: impl Into<String>,
    ) -> Self {
        self.known
            .entry(reference.into())
            .or_default()
            .insert(algorithm, value.into());
        self
    }
}

impl DigestResolver for KnownDigestResolver {
    fn resolve(&self, reference: &str) -> Result<Hashes> {
        if let Some(hashes) = self.known.get(reference) {
            return Ok(hashes.clone());
        }

        let parsed = parse_image_reference(reference)?;
        let mut hashes = Hashes::new();
        if let Some((algorithm, value)) = parsed.digest().and_then(|d| d.split_once(':')) {
            hashes.insert(HashAlgorithm::from(algorithm.to_string()), value.to_string());
        }
        Ok(hashes)
    }
}

fn subject_for(pref: &ProductRef, hashes: &Hashes) -> Subject {
    hashes
        .iter()
        .fold(Subject::new(pref.name.clone()), |subject, (algo, value)| {
            subject.with_digest(algo.digest_key(), value.clone())
        })
}

/// Build the subjects an attestation of `doc` must cover.
///
/// Every image reference becomes a subject, with its digest taken from the
/// document or from `resolver`. Hashed non-image products become subjects
/// too. Products without any hash cannot be attested and are skipped.
pub fn build_subjects(doc: &VexDocument, resolver: &dyn DigestResolver) -> Result<Vec<Subject>> {
    let products = list_document_products(Some(doc))?;
    let normalized = normalize_products(products)?;

    let mut subjects = Vec::new();
    for image in &normalized.image_refs {
        let hashes = if image.hashes.is_empty() {
            resolver.resolve(&image.name)?
        } else {
            image.hashes.clone()
        };
        if hashes.is_empty() {
            return Err(VexError::attestation(
                "building attestation subjects",
                AttestationErrorKind::UnresolvableDigest(image.name.clone()),
            ));
        }
        subjects.push(subject_for(image, &hashes));
    }

    for other in &normalized.other_refs {
        if other.hashes.is_empty() {
            tracing::warn!("skipping {}: no hashes to attest", other.name);
            continue;
        }
        subjects.push(subject_for(other, &other.hashes));
    }

    for unattestable in &normalized.unattestable_refs {
        tracing::warn!(
            "{} cannot be attested without a hash, skipping",
            unattestable.name
        );
    }

    Ok(subjects)
}

/// Image references an attestation should be attached to.
///
/// Explicit `refs` win. Otherwise every subject whose name parses as an
/// image reference is a target.
#[must_use]
pub fn attach_targets(subjects: &[Subject], refs: &[String]) -> Vec<String> {
    if !refs.is_empty() {
        return refs.to_vec();
    }

    subjects
        .iter()
        .filter_map(|s| {
            if is_image_reference(&s.name) {
                Some(s.name.clone())
            } else {
                tracing::info!("Skipping attaching to {}. It is not an image reference", s.name);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, Statement, Status};

    const DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn doc_with(products: Vec<Product>) -> VexDocument {
        let mut stmt = Statement::new("CVE-2023-1234", Status::NotAffected);
        stmt.products = products;
        let mut doc = VexDocument::new();
        doc.statements.push(stmt);
        doc
    }

    #[test]
    fn test_subjects_from_purl_and_resolver() {
        let doc = doc_with(vec![
            Product::with_id(format!(
                "pkg:oci/app@sha256:{DIGEST}?repository_url=ghcr.io/example"
            )),
            Product::with_id("ghcr.io/example/tool:1.0"),
            Product::with_id("pkg:npm/leftpad@1.0.0"),
            Product::with_id("pkg:npm/hashed@1.0.0").hash(HashAlgorithm::Sha512, "abcd"),
        ]);
        let resolver = KnownDigestResolver::new().with_digest(
            "ghcr.io/example/tool:1.0",
            HashAlgorithm::Sha256,
            "1111",
        );

        let subjects = build_subjects(&doc, &resolver).expect("subjects");
        let names: Vec<_> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ghcr.io/example/tool:1.0",
                format!("ghcr.io/example/app@sha256:{DIGEST}").as_str(),
                "pkg:npm/hashed@1.0.0",
            ]
        );
        assert_eq!(subjects[0].digest.get("sha256").map(String::as_str), Some("1111"));
        assert_eq!(subjects[1].digest.get("sha256").map(String::as_str), Some(DIGEST));
        assert_eq!(subjects[2].digest.get("sha512").map(String::as_str), Some("abcd"));
    }

    #[test]
    fn test_digest_pinned_in_reference() {
        let reference = format!("ghcr.io/example/app@sha256:{DIGEST}");
        let hashes = KnownDigestResolver::new().resolve(&reference).expect("resolve");
        assert_eq!(hashes.get(&HashAlgorithm::Sha256), Some(&DIGEST.to_string()));
    }

    #[test]
    fn test_unresolvable_image() {
        let doc = doc_with(vec![Product::with_id("ghcr.io/example/tool:1.0")]);
        assert!(matches!(
            build_subjects(&doc, &KnownDigestResolver::new()),
            Err(VexError::Attestation {
                source: AttestationErrorKind::UnresolvableDigest(_),
                ..
            })
        ));
    }

    #[test]
    fn test_attach_targets() {
        let subjects = vec![
            Subject::new("ghcr.io/example/app:1.0"),
            Subject::new("pkg:npm/leftpad@1.0.0"),
        ];
        assert_eq!(attach_targets(&subjects, &[]), vec!["ghcr.io/example/app:1.0"]);

        let explicit = vec!["registry.example.com/other:2".to_string()];
        assert_eq!(attach_targets(&subjects, &explicit), explicit);
    }
}
