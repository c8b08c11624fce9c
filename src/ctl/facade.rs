//! High-level VEX operations composed from a [`VexImplementation`].

use super::implementation::{DefaultImplementation, VexImplementation};
use crate::attestation::{Attestation, DigestResolver, DsseEnvelope};
use crate::error::{AttestationErrorKind, ErrorContext, Result, VexError};
use crate::matching::{NormalizedProducts, ProductRef};
use crate::merge::MergeOptions;
use crate::model::VexDocument;
use crate::reports::SarifReport;
use std::path::PathBuf;

/// Entry point for merging, filtering and attesting VEX documents.
pub struct VexCtl {
    implementation: Box<dyn VexImplementation>,
}

impl Default for VexCtl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VexCtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VexCtl").finish_non_exhaustive()
    }
}

impl VexCtl {
    #[must_use]
    pub fn new() -> Self {
        Self::with_implementation(DefaultImplementation)
    }

    /// Use a custom implementation, typically a test double.
    #[must_use]
    pub fn with_implementation(implementation: impl VexImplementation + 'static) -> Self {
        Self {
            implementation: Box::new(implementation),
        }
    }

    /// Merge already loaded documents.
    pub fn merge(&self, opts: &MergeOptions, docs: &[VexDocument]) -> Result<VexDocument> {
        self.implementation
            .merge(opts, docs)
            .with_context(|| format!("merging {} documents", docs.len()))
    }

    /// Load documents from `paths` and merge them.
    pub fn merge_files(&self, opts: &MergeOptions, paths: &[PathBuf]) -> Result<VexDocument> {
        let docs = self
            .implementation
            .load_files(paths)
            .context("loading vex documents")?;
        self.merge(opts, &docs)
    }

    /// Apply documents to a report, oldest document first.
    pub fn apply(&self, report: &SarifReport, docs: Vec<VexDocument>) -> Result<SarifReport> {
        let mut current = report.clone();
        for doc in self.implementation.sort_documents(docs) {
            current = self
                .implementation
                .apply_single_vex(&current, &doc)
                .context("applying vex document")?;
        }
        Ok(current)
    }

    /// Products a document mentions, sorted by identifier.
    pub fn list_products(&self, doc: Option<&VexDocument>) -> Result<Vec<ProductRef>> {
        self.implementation.list_document_products(doc)
    }

    pub fn normalize_products(&self, products: Vec<ProductRef>) -> Result<NormalizedProducts> {
        self.implementation.normalize_products(products)
    }

    /// Build an attestation for `doc` and check it covers every image.
    pub fn attest(&self, doc: VexDocument, resolver: &dyn DigestResolver) -> Result<Attestation> {
        let subjects = self
            .implementation
            .build_subjects(&doc, resolver)
            .context("generating attestation subjects")?;
        if subjects.is_empty() {
            return Err(VexError::attestation(
                "generating attestation subjects",
                AttestationErrorKind::NoSubjects,
            ));
        }

        let att = Attestation::new(doc).with_subjects(subjects);
        self.implementation
            .verify_image_subjects(&att, &att.predicate)
            .context("verifying attestation subjects")?;
        Ok(att)
    }

    pub fn verify(&self, att: &Attestation, doc: &VexDocument) -> Result<()> {
        self.implementation.verify_image_subjects(att, doc)
    }

    pub fn attestation_bytes(&self, att: &Attestation) -> Result<Vec<u8>> {
        self.implementation.attestation_bytes(att)
    }

    /// VEX documents found in a set of signed envelopes; others are skipped.
    pub fn read_signed_vex(&self, envelopes: &[DsseEnvelope]) -> Result<Vec<VexDocument>> {
        let mut docs = Vec::new();
        for envelope in envelopes {
            if let Some(doc) = self.implementation.read_signed_vex(envelope)? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{KnownDigestResolver, Subject};
    use crate::model::{HashAlgorithm, Product, Statement, Status};
    use crate::reports::SarifResult;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Delegates to the default implementation, counting filter calls and
    /// optionally reporting every subject as present.
    #[derive(Default)]
    struct Recording {
        applied: Arc<AtomicUsize>,
        skip_verification: bool,
    }

    impl VexImplementation for Recording {
        fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<VexDocument>> {
            DefaultImplementation.load_files(paths)
        }
        fn sort_documents(&self, docs: Vec<VexDocument>) -> Vec<VexDocument> {
            DefaultImplementation.sort_documents(docs)
        }
        fn merge(&self, opts: &MergeOptions, docs: &[VexDocument]) -> Result<VexDocument> {
            DefaultImplementation.merge(opts, docs)
        }
        fn apply_single_vex(
            &self,
            report: &SarifReport,
            doc: &VexDocument,
        ) -> Result<SarifReport> {
            self.applied.fetch_add(1, Ordering::SeqCst);
            DefaultImplementation.apply_single_vex(report, doc)
        }
        fn list_document_products(&self, doc: Option<&VexDocument>) -> Result<Vec<ProductRef>> {
            DefaultImplementation.list_document_products(doc)
        }
        fn normalize_products(&self, products: Vec<ProductRef>) -> Result<NormalizedProducts> {
            DefaultImplementation.normalize_products(products)
        }
        fn build_subjects(
            &self,
            doc: &VexDocument,
            resolver: &dyn DigestResolver,
        ) -> Result<Vec<Subject>> {
            DefaultImplementation.build_subjects(doc, resolver)
        }
        fn verify_image_subjects(&self, att: &Attestation, doc: &VexDocument) -> Result<()> {
            if self.skip_verification {
                return Ok(());
            }
            DefaultImplementation.verify_image_subjects(att, doc)
        }
        fn attestation_bytes(&self, att: &Attestation) -> Result<Vec<u8>> {
            DefaultImplementation.attestation_bytes(att)
        }
        fn read_signed_vex(&self, envelope: &DsseEnvelope) -> Result<Option<VexDocument>> {
            DefaultImplementation.read_signed_vex(envelope)
        }
    }

    fn dated(day: u32, statements: Vec<Statement>) -> VexDocument {
        let ts = Utc
            .with_ymd_and_hms(2023, 5, day, 0, 0, 0)
            .single()
            .expect("valid date");
        let mut doc = VexDocument::new_at(ts);
        doc.statements = statements;
        doc
    }

    #[test]
    fn test_apply_uses_implementation_per_document() {
        let applied = Arc::new(AtomicUsize::new(0));
        let ctl = VexCtl::with_implementation(Recording {
            applied: Arc::clone(&applied),
            ..Recording::default()
        });

        let mut report = SarifReport::new();
        report.runs.push(crate::reports::SarifRun {
            results: vec![SarifResult::new("CVE-2023-0001"), SarifResult::new("CVE-2023-0002")],
            ..Default::default()
        });
        let docs = vec![
            dated(2, vec![Statement::new("CVE-2023-0001", Status::Fixed)]),
            dated(1, vec![Statement::new("CVE-2023-0002", Status::Affected)]),
        ];

        let filtered = ctl.apply(&report, docs).expect("apply");
        assert_eq!(applied.load(Ordering::SeqCst), 2);
        assert_eq!(filtered.result_count(), 1);
    }

    #[test]
    fn test_merge_empty_input_has_context() {
        let err = VexCtl::new()
            .merge(&MergeOptions::default(), &[])
            .expect_err("empty input");
        assert!(err.to_string().contains("merging 0 documents"));
    }

    #[test]
    fn test_attest_builds_verified_attestation() {
        let digest = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let doc = dated(
            1,
            vec![Statement::new("CVE-2023-0001", Status::NotAffected)
                .with_product(Product::with_id("ghcr.io/example/app:1.0"))],
        );
        let resolver = KnownDigestResolver::new().with_digest(
            "ghcr.io/example/app:1.0",
            HashAlgorithm::Sha256,
            digest,
        );

        let att = VexCtl::new().attest(doc.clone(), &resolver).expect("attest");
        assert_eq!(att.predicate, doc);
        assert_eq!(att.subject_names(), vec!["ghcr.io/example/app:1.0"]);
        VexCtl::new().verify(&att, &doc).expect("verified");
    }

    #[test]
    fn test_attest_without_attestable_products() {
        let doc = dated(
            1,
            vec![Statement::new("CVE-2023-0001", Status::NotAffected)
                .with_product(Product::with_id("pkg:npm/leftpad@1.0.0"))],
        );
        let ctl = VexCtl::with_implementation(Recording {
            skip_verification: true,
            ..Recording::default()
        });
        assert!(matches!(
            ctl.attest(doc, &KnownDigestResolver::new()),
            Err(VexError::Attestation {
                source: AttestationErrorKind::NoSubjects,
                ..
            })
        ));
    }

    #[test]
    fn test_read_signed_vex_skips_foreign_envelopes() {
        let doc = dated(1, vec![Statement::new("CVE-2023-0001", Status::Fixed)]);
        let att = Attestation::new(doc.clone());
        let ctl = VexCtl::new();
        let bytes = ctl.attestation_bytes(&att).expect("bytes");

        let mut foreign = DsseEnvelope::in_toto(b"{}");
        foreign.payload_type = "application/octet-stream".to_string();
        let docs = ctl
            .read_signed_vex(&[DsseEnvelope::in_toto(&bytes), foreign])
            .expect("read");
        assert_eq!(docs, vec![doc]);
    }
}
