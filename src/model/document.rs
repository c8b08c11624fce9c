//! The OpenVEX document.

use super::statement::{sort_statements, Statement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON-LD context of OpenVEX v0.2.0 documents.
pub const CONTEXT: &str = "https://openvex.dev/ns/v0.2.0";

/// Predicate type URI identifying OpenVEX attestations.
pub const TYPE_URI: &str = "https://openvex.dev/ns";

/// Author recorded on documents created without one.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Role recorded on documents created without one.
pub const DEFAULT_ROLE: &str = "Document Creator";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub author: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooling: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

fn default_context() -> String {
    CONTEXT.to_string()
}

const fn default_version() -> u32 {
    1
}

/// A VEX document: metadata plus an ordered list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VexDocument {
    #[serde(flatten)]
    pub metadata: Metadata,

    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl VexDocument {
    /// Create an empty document stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    /// Create an empty document with an explicit timestamp.
    #[must_use]
    pub fn new_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            metadata: Metadata {
                context: CONTEXT.to_string(),
                id: None,
                author: DEFAULT_AUTHOR.to_string(),
                role: DEFAULT_ROLE.to_string(),
                timestamp: Some(timestamp),
                last_updated: None,
                version: 1,
                tooling: None,
                supplier: None,
            },
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.metadata.id.as_deref().filter(|id| !id.is_empty())
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.metadata.timestamp
    }

    /// Statements about `id` (matched by name or alias), most recent first.
    ///
    /// Expects the statements to be in document order; call
    /// [`VexDocument::sort_statements`] first when that is not guaranteed.
    #[must_use]
    pub fn statements_by_vulnerability(&self, id: &str) -> Vec<&Statement> {
        self.statements
            .iter()
            .rev()
            .filter(|s| s.vulnerability.matches(id))
            .collect()
    }

    /// Sort the document's statements, cascading the document timestamp.
    pub fn sort_statements(&mut self) {
        let timestamp = self.metadata.timestamp;
        sort_statements(&mut self.statements, timestamp);
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for VexDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort documents by timestamp, oldest first. Undated documents come first.
#[must_use]
pub fn sort_documents(mut docs: Vec<VexDocument>) -> Vec<VexDocument> {
    docs.sort_by_key(VexDocument::timestamp);
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::TimeZone;

    #[test]
    fn test_new_document_defaults() {
        let doc = VexDocument::new();
        assert_eq!(doc.metadata.context, CONTEXT);
        assert_eq!(doc.metadata.author, DEFAULT_AUTHOR);
        assert_eq!(doc.metadata.role, DEFAULT_ROLE);
        assert_eq!(doc.metadata.version, 1);
        assert!(doc.timestamp().is_some());
        assert!(doc.id().is_none());
    }

    #[test]
    fn test_empty_id_is_absent() {
        let mut doc = VexDocument::new();
        doc.metadata.id = Some(String::new());
        assert!(doc.id().is_none());
    }

    #[test]
    fn test_statements_by_vulnerability_most_recent_first() {
        let t1 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single().expect("date");
        let t2 = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).single().expect("date");
        let mut doc = VexDocument::new_at(t1);
        doc.statements = vec![
            Statement::new("CVE-2023-1", Status::NotAffected).with_timestamp(t2),
            Statement::new("CVE-2023-1", Status::Affected).with_timestamp(t1),
            Statement::new("CVE-2023-2", Status::Fixed),
        ];
        doc.sort_statements();

        let found = doc.statements_by_vulnerability("CVE-2023-1");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].status, Status::NotAffected);
        assert!(doc.statements_by_vulnerability("CVE-2023-3").is_empty());
    }

    #[test]
    fn test_sort_documents_by_timestamp() {
        let older = VexDocument::new_at(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).single().expect("date"));
        let newer = VexDocument::new_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"));
        let mut undated = VexDocument::new();
        undated.metadata.timestamp = None;

        let sorted = sort_documents(vec![newer.clone(), undated, older.clone()]);
        assert!(sorted[0].timestamp().is_none());
        assert_eq!(sorted[1], older);
        assert_eq!(sorted[2], newer);
    }

    #[test]
    fn test_deserialize_minimal_document() {
        let json = r#"{
            "@context": "https://openvex.dev/ns/v0.2.0",
            "@id": "https://example.com/vex-1",
            "author": "Example Security",
            "timestamp": "2023-01-08T18:02:03Z",
            "version": 1,
            "statements": [
                {
                    "vulnerability": { "name": "CVE-2021-44228" },
                    "products": [ { "@id": "pkg:oci/app" } ],
                    "status": "not_affected",
                    "justification": "vulnerable_code_not_present"
                }
            ]
        }"#;
        let doc: VexDocument = serde_json::from_str(json).expect("should parse");
        assert_eq!(doc.id(), Some("https://example.com/vex-1"));
        assert_eq!(doc.statements.len(), 1);
        assert_eq!(doc.statements[0].status, Status::NotAffected);
        assert!(doc.statements[0].timestamp.is_none());
    }
}
