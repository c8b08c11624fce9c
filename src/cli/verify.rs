//! Verify command handler.
//!
//! Implements the `verify` subcommand: checks that an attestation names
//! every container image its VEX document covers.

use crate::config::AppConfig;
use crate::ctl::VexCtl;
use crate::error::{AttestationErrorKind, VexError};
use crate::pipeline::{exit_codes, parse_attestation_with_context, parse_vex_with_context};
use anyhow::Result;
use std::path::Path;

/// Run the verify command, returning the desired exit code.
///
/// The document defaults to the attestation's own predicate.
pub fn run_verify(
    attestation_path: &Path,
    document_path: Option<&Path>,
    config: &AppConfig,
) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let att = parse_attestation_with_context(attestation_path)?;
    let doc = match document_path {
        Some(path) => parse_vex_with_context(path, quiet)?,
        None => att.predicate.clone(),
    };

    match VexCtl::new().verify(&att, &doc) {
        Ok(()) => {
            if !quiet {
                tracing::info!("All image references are attestation subjects");
            }
            Ok(exit_codes::SUCCESS)
        }
        Err(
            err @ VexError::Attestation {
                source: AttestationErrorKind::MissingSubject { .. },
                ..
            },
        ) => {
            tracing::error!("{}", describe(&err));
            Ok(exit_codes::VERIFICATION_FAILED)
        }
        Err(err) => Err(err.into()),
    }
}

fn describe(err: &VexError) -> String {
    match err {
        VexError::Attestation { context, source } => format!("{context}: {source}"),
        other => other.to_string(),
    }
}
