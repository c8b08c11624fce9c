//! Checking that an attestation covers every image a document names.

use super::types::Attestation;
use crate::error::{AttestationErrorKind, ErrorContext, Result, VexError};
use crate::matching::{list_document_products, normalize_products};
use crate::model::VexDocument;

/// Fail unless every image the document refers to is an attestation subject.
///
/// Products are checked in index order; the first one missing from the
/// subjects is reported along with the full subject list.
pub fn verify_image_subjects(att: &Attestation, doc: &VexDocument) -> Result<()> {
    let products =
        list_document_products(Some(doc)).context("listing products in the document")?;
    let normalized = normalize_products(products).context("normalizing references")?;

    for image in &normalized.image_refs {
        if !att.subject.iter().any(|s| s.name == image.name) {
            return Err(VexError::attestation(
                "verifying image subjects",
                AttestationErrorKind::MissingSubject {
                    product: image.name.clone(),
                    subjects: att.subject_names(),
                },
            ));
        }
    }

    tracing::debug!(
        "all {} image references are attestation subjects",
        normalized.image_refs.len()
    );
    Ok(())
}
