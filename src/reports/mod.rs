//! Scan reports and VEX-based filtering.
//!
//! Reports are read as SARIF 2.1.0. [`apply_single_vex`] removes the findings
//! a VEX document resolves (`not_affected` or `fixed`); [`apply_vex`] does
//! the same for a set of documents, oldest first.
//!
//! Rule IDs are mapped to vulnerability IDs by scheme:
//!
//! | Rule ID prefix | Vulnerability ID |
//! |---|---|
//! | `CVE` | leading `CVE-<year>-<number>` |
//! | `GHSA`, `PRISMA`, `RHSA`, `RUSTSEC`, `SNYK` | the whole rule ID |
//! | anything else | none, the finding is kept |

mod filter;
mod sarif;

pub use filter::{apply_single_vex, apply_vex, vulnerability_id};
pub use sarif::{
    parse_sarif_file, parse_sarif_str, SarifLevel, SarifMessage, SarifReport, SarifResult,
    SarifRun, SARIF_VERSION,
};
