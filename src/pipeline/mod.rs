//! Shared plumbing for CLI command handlers: loading inputs with context,
//! rendering and writing output, and exit codes.

mod output;
mod parse;

pub use output::{render_json, write_output, OutputTarget};
pub use parse::{
    parse_attestation_with_context, parse_sarif_with_context, parse_vex_files,
    parse_vex_with_context,
};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// An attestation does not cover every image its document names
    pub const VERIFICATION_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
