//! The capability set behind [`VexCtl`](super::VexCtl).

use crate::attestation::{self, Attestation, DigestResolver, DsseEnvelope, Subject};
use crate::error::Result;
use crate::matching::{self, NormalizedProducts, ProductRef};
use crate::merge::{self, MergeOptions};
use crate::model::{self, VexDocument};
use crate::parsers;
use crate::reports::{self, SarifReport};
use std::path::PathBuf;

/// Operations the VEX controller is built from.
///
/// Swapping the implementation lets tests replace any single step with a
/// double while keeping the rest of the controller real.
pub trait VexImplementation: Send + Sync {
    fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<VexDocument>>;

    fn sort_documents(&self, docs: Vec<VexDocument>) -> Vec<VexDocument>;

    fn merge(&self, opts: &MergeOptions, docs: &[VexDocument]) -> Result<VexDocument>;

    fn apply_single_vex(&self, report: &SarifReport, doc: &VexDocument) -> Result<SarifReport>;

    fn list_document_products(&self, doc: Option<&VexDocument>) -> Result<Vec<ProductRef>>;

    fn normalize_products(&self, products: Vec<ProductRef>) -> Result<NormalizedProducts>;

    fn build_subjects(
        &self,
        doc: &VexDocument,
        resolver: &dyn DigestResolver,
    ) -> Result<Vec<Subject>>;

    fn verify_image_subjects(&self, att: &Attestation, doc: &VexDocument) -> Result<()>;

    fn attestation_bytes(&self, att: &Attestation) -> Result<Vec<u8>>;

    fn read_signed_vex(&self, envelope: &DsseEnvelope) -> Result<Option<VexDocument>>;
}

/// The library's own implementation of every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImplementation;

impl VexImplementation for DefaultImplementation {
    fn load_files(&self, paths: &[PathBuf]) -> Result<Vec<VexDocument>> {
        parsers::load_files(paths)
    }

    fn sort_documents(&self, docs: Vec<VexDocument>) -> Vec<VexDocument> {
        model::sort_documents(docs)
    }

    fn merge(&self, opts: &MergeOptions, docs: &[VexDocument]) -> Result<VexDocument> {
        merge::merge(opts, docs)
    }

    fn apply_single_vex(&self, report: &SarifReport, doc: &VexDocument) -> Result<SarifReport> {
        reports::apply_single_vex(report, doc)
    }

    fn list_document_products(&self, doc: Option<&VexDocument>) -> Result<Vec<ProductRef>> {
        matching::list_document_products(doc)
    }

    fn normalize_products(&self, products: Vec<ProductRef>) -> Result<NormalizedProducts> {
        matching::normalize_products(products)
    }

    fn build_subjects(
        &self,
        doc: &VexDocument,
        resolver: &dyn DigestResolver,
    ) -> Result<Vec<Subject>> {
        attestation::build_subjects(doc, resolver)
    }

    fn verify_image_subjects(&self, att: &Attestation, doc: &VexDocument) -> Result<()> {
        attestation::verify_image_subjects(att, doc)
    }

    fn attestation_bytes(&self, att: &Attestation) -> Result<Vec<u8>> {
        attestation::attestation_bytes(att)
    }

    fn read_signed_vex(&self, envelope: &DsseEnvelope) -> Result<Option<VexDocument>> {
        attestation::read_signed_vex(envelope)
    }
}
