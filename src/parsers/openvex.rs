//! OpenVEX document parser.
//!
//! Parses standalone OpenVEX JSON documents into the [`VexDocument`] model.
//! Field names follow OpenVEX v0.2.0 (<https://github.com/openvex/spec>).

use crate::error::{ErrorContext, ParseErrorKind, Result, VexError};
use crate::model::{VexDocument, TYPE_URI};
use std::path::Path;

/// Parse an OpenVEX document from a JSON string.
pub fn parse_vex_str(content: &str) -> Result<VexDocument> {
    let doc: VexDocument = serde_json::from_str(content).map_err(|e| {
        VexError::parse("decoding OpenVEX JSON", ParseErrorKind::InvalidJson(e.to_string()))
    })?;
    validate(&doc)?;
    Ok(doc)
}

/// Parse an OpenVEX document from a file path.
pub fn parse_vex_file(path: &Path) -> Result<VexDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| VexError::io(path, e))?;
    parse_vex_str(&content).with_context(|| format!("opening {}", path.display()))
}

/// Load several documents, failing on the first one that cannot be read.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<VexDocument>> {
    paths
        .iter()
        .map(|path| parse_vex_file(path.as_ref()))
        .collect()
}

fn validate(doc: &VexDocument) -> Result<()> {
    if !doc.metadata.context.starts_with(TYPE_URI) {
        tracing::warn!(
            "Document context {:?} is not an OpenVEX context",
            doc.metadata.context
        );
    }

    for (i, stmt) in doc.statements.iter().enumerate() {
        if stmt.vulnerability.name.trim().is_empty() {
            return Err(VexError::parse(
                "validating statements",
                ParseErrorKind::InvalidValue {
                    field: format!("statements[{i}].vulnerability.name"),
                    message: "vulnerability name must not be empty".to_string(),
                },
            ));
        }
    }
    Ok(())
}
