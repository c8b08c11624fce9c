//! SARIF 2.1.0 scan report model.
//!
//! Only the parts the filter reads are typed. Everything else a scanner puts
//! in the report (tool metadata, rules, locations, fingerprints) is kept in
//! the `extra` maps so a filtered report serializes back with the same shape.

use crate::error::{ReportErrorKind, Result, VexError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const SARIF_VERSION: &str = "2.1.0";

/// A SARIF log: one or more runs of an analysis tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifReport {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub runs: Vec<SarifRun>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    SARIF_VERSION.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    #[serde(default)]
    pub results: Vec<SarifResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SarifLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<SarifMessage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SarifResult {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            ..Self::default()
        }
    }
}

/// Result message. SARIF allows `id` plus `arguments` in place of `text`;
/// those stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    None,
    Note,
    Warning,
    Error,
}

impl SarifReport {
    /// An empty report with the standard schema and version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: Some("https://json.schemastore.org/sarif-2.1.0.json".to_string()),
            version: SARIF_VERSION.to_string(),
            runs: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Total number of results across all runs.
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.runs.iter().map(|run| run.results.len()).sum()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            VexError::report(
                "serializing SARIF report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })
    }
}

impl Default for SarifReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a SARIF report from JSON.
pub fn parse_sarif_str(content: &str) -> Result<SarifReport> {
    serde_json::from_str(content).map_err(|e| {
        VexError::report(
            "decoding SARIF JSON",
            ReportErrorKind::InvalidSarif(e.to_string()),
        )
    })
}

/// Read and parse a SARIF report file.
pub fn parse_sarif_file(path: &Path) -> Result<SarifReport> {
    let content = std::fs::read_to_string(path).map_err(|e| VexError::io(path, e))?;
    parse_sarif_str(&content).map_err(|e| match e {
        VexError::Report { context, source } => VexError::Report {
            context: format!("opening {}: {context}", path.display()),
            source,
        },
        other => other,
    })
}
