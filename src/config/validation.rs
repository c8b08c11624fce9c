//! Configuration validation for vex-tools.

use super::types::{AppConfig, AttestConfig, BehaviorConfig, MergeConfig, OutputConfig};
use crate::matching::is_image_reference;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.merge.validate());
        errors.extend(self.attest.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for MergeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("merge.author", &self.author),
            ("merge.author_role", &self.author_role),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                errors.push(ConfigError::new(field, "must not be blank when set"));
            }
        }
        errors
    }
}

impl Validatable for AttestConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (reference, digest) in &self.digests {
            let field = format!("attest.digests.{reference}");
            if !is_image_reference(reference) {
                errors.push(ConfigError::new(
                    field.clone(),
                    format!("'{reference}' is not an image reference"),
                ));
            }
            let well_formed = digest.split_once(':').is_some_and(|(algo, hex)| {
                !algo.is_empty() && !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
            });
            if !well_formed {
                errors.push(ConfigError::new(
                    field,
                    format!("digest '{digest}' must look like 'sha256:<hex>'"),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.quiet && self.verbose {
            errors.push(ConfigError::new(
                "behavior",
                "quiet and verbose cannot both be enabled",
            ));
        }
        errors
    }
}
