//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".vex-tools.yaml",
    ".vex-tools.yml",
    "vex-tools.yaml",
    "vex-tools.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/vex-tools/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("vex-tools")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Used to layer CLI args over file config.
    pub fn merge(&mut self, other: &Self) {
        if other.merge.author.is_some() {
            self.merge.author.clone_from(&other.merge.author);
        }
        if other.merge.author_role.is_some() {
            self.merge.author_role.clone_from(&other.merge.author_role);
        }

        for (reference, digest) in &other.attest.digests {
            self.attest
                .digests
                .insert(reference.clone(), digest.clone());
        }

        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.compact {
            self.output.compact = true;
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.verbose {
            self.behavior.verbose = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# vex-tools configuration
# ========================
#
# Place this file at:
#   - .vex-tools.yaml in your project root
#   - ~/.config/vex-tools/vex-tools.yaml for global config
#
# CLI arguments always override file settings.

# Defaults for merged documents, e.g.
#   author: Security Team
#   author_role: Maintainer
merge: {}

# Attestation settings
attest:
  # Known digests for image references, used when a document does not
  # pin the digest itself, e.g.
  #   ghcr.io/example/app:1.0: sha256:<hex>
  digests: {}

# Output configuration
output:
  # Output file path (omit for stdout)
  # file: merged.openvex.json
  # Single-line JSON instead of pretty-printed
  compact: false

# Behavior flags
behavior:
  # Only log warnings and errors
  quiet: false
  # Log per-statement decisions
  verbose: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp.path().join(".vex-tools.yaml");
        std::fs::write(&config_path, "merge:\n  author: Jane\n").expect("write");

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().expect("tempdir");
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
merge:
  author: Security Team
  author_role: Maintainer
attest:
  digests:
    ghcr.io/example/app:1.0: sha256:abcd
output:
  compact: true
";
        std::fs::write(&config_path, yaml).expect("write");

        let config = load_config_file(&config_path).expect("load");
        assert_eq!(config.merge.author.as_deref(), Some("Security Team"));
        assert_eq!(config.merge.author_role.as_deref(), Some("Maintainer"));
        assert_eq!(config.attest.digests.len(), 1);
        assert!(config.output.compact);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_invalid_yaml() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "merge: [unclosed").expect("write");
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder()
            .author(Some("File Author".to_string()))
            .image_digest("ghcr.io/example/a:1", "sha256:aaaa")
            .build();
        let overrides = AppConfig::builder()
            .author_role(Some("Maintainer".to_string()))
            .image_digest("ghcr.io/example/b:1", "sha256:bbbb")
            .quiet(true)
            .build();

        base.merge(&overrides);

        assert_eq!(base.merge.author.as_deref(), Some("File Author"));
        assert_eq!(base.merge.author_role.as_deref(), Some("Maintainer"));
        assert_eq!(base.attest.digests.len(), 2);
        assert!(base.behavior.quiet);
    }

    #[test]
    fn test_example_config_parses() {
        let config: AppConfig =
            serde_yaml_ng::from_str(&generate_example_config()).expect("example parses");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "behavior:\n  verbose: true\n").expect("write");

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
