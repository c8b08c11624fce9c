//! The statement merger.

use super::MergeOptions;
use crate::error::{MergeErrorKind, Result, VexError};
use crate::model::{sort_statements, Statement, VexDocument};
use sha2::{Digest, Sha256};

const MERGED_ID_PREFIX: &str = "merged-vex-";

/// Merge `documents` into a new document according to `opts`.
///
/// Inputs are left untouched. Statements without a timestamp take their
/// document's timestamp; if the document has none either, the merge fails
/// with [`MergeErrorKind::MissingTimestamp`].
pub fn merge(opts: &MergeOptions, documents: &[VexDocument]) -> Result<VexDocument> {
    if documents.is_empty() {
        return Err(VexError::merge("merging documents", MergeErrorKind::EmptyInput));
    }

    let mut merged = VexDocument::new();
    merged.metadata.id = Some(
        opts.document_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| derive_document_id(documents)),
    );
    if !opts.author.is_empty() {
        merged.metadata.author.clone_from(&opts.author);
    }
    if !opts.author_role.is_empty() {
        merged.metadata.role.clone_from(&opts.author_role);
    }

    let mut statements = Vec::new();
    for (index, doc) in documents.iter().enumerate() {
        for stmt in &doc.statements {
            if !passes_filters(opts, stmt) {
                tracing::debug!(
                    "skipping statement for {} from document {}",
                    stmt.vulnerability.name,
                    index
                );
                continue;
            }

            let mut stmt = stmt.clone();
            if stmt.timestamp.is_none() {
                let timestamp = doc.timestamp().ok_or_else(|| {
                    VexError::merge(
                        "cascading document timestamp",
                        MergeErrorKind::MissingTimestamp {
                            document: document_label(doc, index),
                            vulnerability: stmt.vulnerability.name.clone(),
                        },
                    )
                })?;
                stmt.timestamp = Some(timestamp);
            }
            statements.push(stmt);
        }
    }

    sort_statements(&mut statements, merged.timestamp());
    tracing::info!(
        "merged {} statements from {} documents into {}",
        statements.len(),
        documents.len(),
        merged.id().unwrap_or_default()
    );
    merged.statements = statements;

    Ok(merged)
}

/// Derive a stable ID for the merge of `documents`.
///
/// Documents without an ID are named by their position. The names are
/// sorted, joined with `:` and hashed, so the result does not depend on the
/// order documents with IDs are given in.
#[must_use]
pub fn derive_document_id(documents: &[VexDocument]) -> String {
    let mut ids: Vec<String> = documents
        .iter()
        .enumerate()
        .map(|(index, doc)| document_label(doc, index))
        .collect();
    ids.sort();

    let digest = Sha256::digest(ids.join(":").as_bytes());
    format!("{MERGED_ID_PREFIX}{digest:x}")
}

fn document_label(doc: &VexDocument, index: usize) -> String {
    doc.id()
        .map_or_else(|| format!("VEX-DOC-{index}"), ToString::to_string)
}

fn passes_filters(opts: &MergeOptions, stmt: &Statement) -> bool {
    if !opts.products.is_empty() && !opts.products.iter().any(|p| stmt.matches_product(p)) {
        return false;
    }
    if !opts.vulnerabilities.is_empty()
        && !opts
            .vulnerabilities
            .iter()
            .any(|v| stmt.vulnerability.matches(v))
    {
        return false;
    }
    true
}
