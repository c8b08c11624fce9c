//! Configuration types for vex-tools.

use crate::attestation::KnownDigestResolver;
use crate::merge::MergeOptions;
use crate::model::HashAlgorithm;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration loaded from a config file, CLI
/// arguments, or both (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for merged documents
    pub merge: MergeConfig,
    /// Attestation settings
    pub attest: AttestConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn author(mut self, author: Option<String>) -> Self {
        self.config.merge.author = author;
        self
    }

    pub fn author_role(mut self, role: Option<String>) -> Self {
        self.config.merge.author_role = role;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn compact(mut self, compact: bool) -> Self {
        self.config.output.compact = compact;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.behavior.verbose = verbose;
        self
    }

    /// Record a known digest (`algorithm:hex`) for an image reference.
    pub fn image_digest(mut self, reference: impl Into<String>, digest: impl Into<String>) -> Self {
        self.config
            .attest
            .digests
            .insert(reference.into(), digest.into());
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Defaults applied when merging documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MergeConfig {
    /// Author recorded on merged documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Role of the author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,
}

impl MergeConfig {
    /// Merge options carrying this config's author settings.
    #[must_use]
    pub fn to_options(&self) -> MergeOptions {
        MergeOptions {
            author: self.author.clone().unwrap_or_default(),
            author_role: self.author_role.clone().unwrap_or_default(),
            ..MergeOptions::default()
        }
    }
}

/// Attestation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AttestConfig {
    /// Known image digests, keyed by image reference (`sha256:<hex>` values)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub digests: BTreeMap<String, String>,
}

impl AttestConfig {
    /// Digest resolver seeded with the configured digests.
    ///
    /// Entries that are not `algorithm:hex` are skipped; validation reports them.
    #[must_use]
    pub fn resolver(&self) -> KnownDigestResolver {
        self.digests
            .iter()
            .filter_map(|(reference, digest)| {
                digest
                    .split_once(':')
                    .map(|(algo, hex)| (reference, algo, hex))
            })
            .fold(KnownDigestResolver::new(), |resolver, (reference, algo, hex)| {
                resolver.with_digest(
                    reference.clone(),
                    HashAlgorithm::from(algo.to_string()),
                    hex,
                )
            })
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (stdout when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Write single-line JSON instead of pretty-printed
    pub compact: bool,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Only log warnings and errors
    pub quiet: bool,
    /// Log debug detail
    pub verbose: bool,
}
