//! Products command handler.
//!
//! Implements the `products` subcommand: lists the products a document
//! names, optionally grouped by how they can be attested.

use crate::config::AppConfig;
use crate::ctl::VexCtl;
use crate::pipeline::{exit_codes, parse_vex_with_context, render_json, write_output, OutputTarget};
use anyhow::Result;
use std::path::Path;

/// Run the products command, returning the desired exit code.
pub fn run_products(path: &Path, normalize: bool, config: &AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let doc = parse_vex_with_context(path, quiet)?;

    let ctl = VexCtl::new();
    let products = ctl.list_products(Some(&doc))?;
    let json = if normalize {
        let normalized = ctl.normalize_products(products)?;
        if !quiet {
            tracing::info!(
                "{} image, {} other and {} unattestable products",
                normalized.image_refs.len(),
                normalized.other_refs.len(),
                normalized.unattestable_refs.len()
            );
        }
        render_json(&normalized, config.output.compact)?
    } else {
        render_json(&products, config.output.compact)?
    };

    write_output(
        &json,
        &OutputTarget::from_option(config.output.file.clone()),
        quiet,
    )?;
    Ok(exit_codes::SUCCESS)
}
