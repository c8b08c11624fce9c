//! Configuration for vex-tools.
//!
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.vex-tools.yaml` file in your project root or `~/.config/vex-tools/`:
//!
//! ```yaml
//! merge:
//!   author: Security Team
//!   author_role: Maintainer
//! attest:
//!   digests:
//!     ghcr.io/example/app:1.0: sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, AttestConfig, BehaviorConfig, MergeConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `.vex-tools.yaml` format.
///
/// Editors can use it for validation and autocompletion.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
