//! Loading CLI inputs with context for error messages.

use crate::attestation::{parse_attestation_str, Attestation};
use crate::model::VexDocument;
use crate::reports::{parse_sarif_str, SarifReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Parse a VEX document with context for error messages
pub fn parse_vex_with_context(path: &Path, quiet: bool) -> Result<VexDocument> {
    if !quiet {
        tracing::info!("Parsing VEX document: {}", path.display());
    }

    let doc = crate::parsers::parse_vex_file(path)
        .with_context(|| format!("Failed to parse VEX document: {}", path.display()))?;

    if !quiet {
        tracing::info!("Parsed {} statements", doc.statements.len());
    }
    Ok(doc)
}

/// Parse several VEX documents, failing on the first bad one.
pub fn parse_vex_files(paths: &[PathBuf], quiet: bool) -> Result<Vec<VexDocument>> {
    paths
        .iter()
        .map(|path| parse_vex_with_context(path, quiet))
        .collect()
}

/// Parse a SARIF scan report
pub fn parse_sarif_with_context(path: &Path) -> Result<SarifReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read SARIF report: {}", path.display()))?;
    let report = parse_sarif_str(&content)
        .with_context(|| format!("Failed to parse SARIF report: {}", path.display()))?;
    tracing::debug!(
        "Parsed SARIF report with {} results in {} runs",
        report.result_count(),
        report.runs.len()
    );
    Ok(report)
}

/// Parse an attestation, bare or inside a DSSE envelope
pub fn parse_attestation_with_context(path: &Path) -> Result<Attestation> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read attestation: {}", path.display()))?;
    parse_attestation_str(&content)
        .with_context(|| format!("Failed to parse attestation: {}", path.display()))
}
