//! Attest command handler.
//!
//! Implements the `attest` subcommand: wraps a VEX document in an in-toto
//! attestation whose subjects are the document's attestable products.
//! Signing and attaching the result to a registry are left to signing tools.

use crate::attestation::{attach_targets, DsseEnvelope};
use crate::config::AppConfig;
use crate::ctl::VexCtl;
use crate::pipeline::{exit_codes, parse_vex_with_context, render_json, write_output, OutputTarget};
use anyhow::Result;
use std::path::Path;

/// Run the attest command, returning the desired exit code.
///
/// With `envelope`, the attestation is emitted as the payload of an unsigned
/// DSSE envelope ready for a signer.
pub fn run_attest(
    path: &Path,
    refs: &[String],
    envelope: bool,
    config: &AppConfig,
) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let doc = parse_vex_with_context(path, quiet)?;

    let ctl = VexCtl::new();
    let att = ctl.attest(doc, &config.attest.resolver())?;

    let targets = attach_targets(&att.subject, refs);
    if !quiet {
        tracing::info!(
            "Attestation covers {} subjects; attach targets: {}",
            att.subject.len(),
            targets.join(", ")
        );
    }

    let json = if envelope {
        let bytes = ctl.attestation_bytes(&att)?;
        render_json(&DsseEnvelope::in_toto(&bytes), config.output.compact)?
    } else {
        render_json(&att, config.output.compact)?
    };

    write_output(
        &json,
        &OutputTarget::from_option(config.output.file.clone()),
        quiet,
    )?;
    Ok(exit_codes::SUCCESS)
}
