//! Unified error types for vex-tools.
//!
//! Every fatal condition in the merge, filter, normalize and attestation
//! paths surfaces as a [`VexError`]. Non-fatal anomalies (for example a
//! malformed CVE rule ID in a SARIF report) are logged and never reach here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vex-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VexError {
    /// Errors while reading a VEX document or attestation
    #[error("Failed to parse VEX document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while merging documents
    #[error("Merge failed: {context}")]
    Merge {
        context: String,
        #[source]
        source: MergeErrorKind,
    },

    /// Errors while normalizing product identifiers
    #[error("Identifier normalization failed: {context}")]
    Identifier {
        context: String,
        #[source]
        source: IdentifierErrorKind,
    },

    /// Errors while reading or rewriting a scan report
    #[error("Report processing failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// Errors while building, reading or verifying attestations
    #[error("Attestation failed: {context}")]
    Attestation {
        context: String,
        #[source]
        source: AttestationErrorKind,
    },

    /// An operation that requires a document was handed none
    #[error("cannot read products, vex document is missing")]
    MissingDocument,

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Specific merge error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MergeErrorKind {
    #[error("at least one vex document is required to merge")]
    EmptyInput,

    #[error("unable to cascade timestamp from document {document} to timeless statement for {vulnerability}")]
    MissingTimestamp {
        document: String,
        vulnerability: String,
    },
}

/// Specific identifier error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IdentifierErrorKind {
    #[error("Malformed PURL: {purl} - {reason}")]
    InvalidPurl { purl: String, reason: String },

    #[error("Invalid image reference: {reference} - {reason}")]
    InvalidImageReference { reference: String, reason: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("Invalid SARIF structure: {0}")]
    InvalidSarif(String),

    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

/// Specific attestation error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AttestationErrorKind {
    #[error("entry for {product} not found in subjects [{}]", .subjects.join(", "))]
    MissingSubject {
        product: String,
        subjects: Vec<String>,
    },

    #[error("Invalid signed envelope: {0}")]
    InvalidEnvelope(String),

    #[error("No digest known for image reference {0}")]
    UnresolvableDigest(String),

    #[error("Document has no attestable products")]
    NoSubjects,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for vex-tools operations
pub type Result<T> = std::result::Result<T, VexError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl VexError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::parse(
            "missing required field",
            ParseErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create a merge error
    pub fn merge(context: impl Into<String>, source: MergeErrorKind) -> Self {
        Self::Merge {
            context: context.into(),
            source,
        }
    }

    /// Create an identifier error
    pub fn identifier(context: impl Into<String>, source: IdentifierErrorKind) -> Self {
        Self::Identifier {
            context: context.into(),
            source,
        }
    }

    /// Create an error for a package URL that violates the purl grammar
    pub fn invalid_purl(purl: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::identifier(
            "parsing OCI purl subject",
            IdentifierErrorKind::InvalidPurl {
                purl: purl.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an attestation error
    pub fn attestation(context: impl Into<String>, source: AttestationErrorKind) -> Self {
        Self::Attestation {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for VexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for VexError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to any context the error already carries,
/// so a failure deep in the merge path reads like
/// `"merging 3 documents: cascading timestamps: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<VexError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: VexError, new_ctx: &str) -> VexError {
    match err {
        VexError::Parse {
            context: existing,
            source,
        } => VexError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        VexError::Merge {
            context: existing,
            source,
        } => VexError::Merge {
            context: chain_context(new_ctx, &existing),
            source,
        },
        VexError::Identifier {
            context: existing,
            source,
        } => VexError::Identifier {
            context: chain_context(new_ctx, &existing),
            source,
        },
        VexError::Report {
            context: existing,
            source,
        } => VexError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        VexError::Attestation {
            context: existing,
            source,
        } => VexError::Attestation {
            context: chain_context(new_ctx, &existing),
            source,
        },
        VexError::Io {
            path,
            message,
            source,
        } => VexError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        VexError::MissingDocument => VexError::MissingDocument,
        VexError::Config(msg) => VexError::Config(chain_context(new_ctx, &msg)),
        VexError::Validation(msg) => VexError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| VexError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| VexError::Validation(f().into()))
    }
}
