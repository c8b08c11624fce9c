//! Merge command handler.
//!
//! Implements the `merge` subcommand for combining VEX documents into one.

use crate::config::AppConfig;
use crate::ctl::VexCtl;
use crate::pipeline::{exit_codes, parse_vex_files, render_json, write_output, OutputTarget};
use anyhow::Result;
use std::path::PathBuf;

/// Filters and overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct MergeArgs {
    pub paths: Vec<PathBuf>,
    pub id: Option<String>,
    pub products: Vec<String>,
    pub vulnerabilities: Vec<String>,
}

/// Run the merge command, returning the desired exit code.
pub fn run_merge(args: MergeArgs, config: &AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let docs = parse_vex_files(&args.paths, quiet)?;

    let mut opts = config
        .merge
        .to_options()
        .products(args.products)
        .vulnerabilities(args.vulnerabilities);
    opts.document_id = args.id;

    let merged = VexCtl::new().merge(&opts, &docs)?;
    if !quiet {
        tracing::info!(
            "Merged {} documents into {} statements",
            docs.len(),
            merged.statements.len()
        );
    }

    let json = render_json(&merged, config.output.compact)?;
    write_output(
        &json,
        &OutputTarget::from_option(config.output.file.clone()),
        quiet,
    )?;
    Ok(exit_codes::SUCCESS)
}

