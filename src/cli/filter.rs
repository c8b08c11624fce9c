//! Filter command handler.
//!
//! Implements the `filter` subcommand: removes the findings of a SARIF
//! report that VEX documents resolve.

use crate::config::AppConfig;
use crate::ctl::VexCtl;
use crate::pipeline::{
    exit_codes, parse_sarif_with_context, parse_vex_files, render_json, write_output,
    OutputTarget,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the filter command, returning the desired exit code.
pub fn run_filter(report_path: &Path, vex_paths: &[PathBuf], config: &AppConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;
    let report = parse_sarif_with_context(report_path)?;
    let docs = parse_vex_files(vex_paths, quiet)?;

    let filtered = VexCtl::new().apply(&report, docs)?;
    if !quiet {
        tracing::info!(
            "{} of {} results remain after applying VEX data",
            filtered.result_count(),
            report.result_count()
        );
    }

    let json = render_json(&filtered, config.output.compact)?;
    write_output(
        &json,
        &OutputTarget::from_option(config.output.file.clone()),
        quiet,
    )?;
    Ok(exit_codes::SUCCESS)
}
