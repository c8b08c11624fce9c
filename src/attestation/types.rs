//! in-toto statement carrying an OpenVEX predicate.

use crate::error::{ReportErrorKind, Result, VexError};
use crate::model::VexDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The in-toto Statement v0.1 type identifier.
pub const STATEMENT_TYPE_V0_1: &str = "https://in-toto.io/Statement/v0.1";

/// Media type of a DSSE payload holding an in-toto statement.
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";

/// An in-toto attestation whose predicate is a VEX document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attestation {
    #[serde(rename = "_type")]
    pub statement_type: String,

    #[serde(rename = "predicateType")]
    pub predicate_type: String,

    #[serde(default)]
    pub subject: Vec<Subject>,

    pub predicate: VexDocument,
}

/// An artifact the attestation is about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub name: String,

    /// Algorithm (`sha256`, ...) to hex digest
    #[serde(default)]
    pub digest: BTreeMap<String, String>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            digest: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_digest(mut self, algorithm: impl Into<String>, digest: impl Into<String>) -> Self {
        self.digest.insert(algorithm.into(), digest.into());
        self
    }
}

impl Attestation {
    /// Wrap `doc` in an attestation with no subjects yet.
    #[must_use]
    pub fn new(doc: VexDocument) -> Self {
        Self {
            statement_type: STATEMENT_TYPE_V0_1.to_string(),
            predicate_type: crate::model::TYPE_URI.to_string(),
            subject: Vec::new(),
            predicate: doc,
        }
    }

    #[must_use]
    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = Subject>) -> Self {
        self.subject.extend(subjects);
        self
    }

    /// Names of all subjects, in declaration order.
    #[must_use]
    pub fn subject_names(&self) -> Vec<String> {
        self.subject.iter().map(|s| s.name.clone()).collect()
    }
}

/// Serialize an attestation to the JSON bytes that get signed and attached.
pub fn attestation_bytes(att: &Attestation) -> Result<Vec<u8>> {
    serde_json::to_vec(att).map_err(|e| {
        VexError::report(
            "serializing attestation to json",
            ReportErrorKind::JsonSerializationError(e.to_string()),
        )
    })
}
