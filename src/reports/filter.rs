//! Suppression of scan findings using VEX statements.
//!
//! A finding is dropped when the most recent statement about its
//! vulnerability says the product is `not_affected` or `fixed`. Anything the
//! filter cannot map to a vulnerability stays in the report.

use super::sarif::{SarifReport, SarifResult};
use crate::error::Result;
use crate::ctl::VexCtl;
use crate::model::VexDocument;
use regex::Regex;
use std::sync::LazyLock;

static CVE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(CVE-\d+-\d+)").expect("static regex"));

/// Rule ID prefixes whose rule IDs are vulnerability IDs as-is.
const VERBATIM_PREFIXES: &[&str] = &["GHSA", "PRISMA", "RHSA", "RUSTSEC", "SNYK"];

/// Apply a single VEX document to `report`, returning the filtered report.
///
/// The input report is not modified.
pub fn apply_single_vex(report: &SarifReport, vexdoc: &VexDocument) -> Result<SarifReport> {
    let mut doc = vexdoc.clone();
    doc.sort_statements();

    let mut filtered = report.clone();
    for run in &mut filtered.runs {
        let before = run.results.len();
        run.results.retain(|result| keep_result(result, &doc));
        tracing::debug!("run filtered from {} to {} results", before, run.results.len());
    }

    tracing::info!(
        "VEX document {} suppressed {} of {} results",
        vexdoc.id().unwrap_or("(unnamed)"),
        report.result_count() - filtered.result_count(),
        report.result_count()
    );
    Ok(filtered)
}

/// Apply several documents in timestamp order, each to the output of the last.
///
/// Equivalent to [`VexCtl::apply`] with the default implementation.
pub fn apply_vex(report: &SarifReport, vexdocs: &[VexDocument]) -> Result<SarifReport> {
    VexCtl::new().apply(report, vexdocs.to_vec())
}

/// Vulnerability ID a SARIF rule ID refers to, if the scheme is recognized.
///
/// Returns `None` for unrecognized schemes and for malformed CVE rule IDs.
#[must_use]
pub fn vulnerability_id(rule_id: &str) -> Option<String> {
    let rule_id = rule_id.trim();
    let prefix = rule_id.split('-').next().unwrap_or_default();

    if prefix == "CVE" {
        let id = CVE_ID.captures(rule_id).and_then(|caps| caps.get(1));
        if id.is_none() {
            tracing::error!("unable to parse CVE ID from rule ID {}", rule_id);
        }
        return id.map(|m| m.as_str().to_string());
    }

    if VERBATIM_PREFIXES.contains(&prefix) {
        return Some(rule_id.to_string());
    }

    None
}

fn keep_result(result: &SarifResult, doc: &VexDocument) -> bool {
    let Some(rule_id) = result.rule_id.as_deref() else {
        return true;
    };
    let Some(vuln_id) = vulnerability_id(rule_id) else {
        return true;
    };

    let statements = doc.statements_by_vulnerability(&vuln_id);
    let Some(latest) = statements.first() else {
        return true;
    };

    if latest.status.resolves_finding() {
        tracing::debug!(
            "suppressing {} ({}): statement status is {}",
            rule_id,
            vuln_id,
            latest.status
        );
        return false;
    }
    true
}
