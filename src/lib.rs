//! # vex-tools
//!
//! `vex-tools` is a library for reconciling [OpenVEX](https://openvex.dev)
//! documents. It merges statements from several documents into one, uses VEX
//! data to drop resolved findings from SARIF scanner reports, normalizes
//! product identifiers, and wraps documents in in-toto attestations whose
//! subjects can later be checked against the images a document names.
//!
//! ## Core Concepts
//!
//! - **Parsing**: documents are loaded from OpenVEX JSON ([`parse_vex_file`],
//!   [`parse_vex_str`]) into the [`VexDocument`] model.
//! - **Merging**: [`merge`] folds documents into a new one, filtered by
//!   product and vulnerability and ordered so the latest statement about a
//!   vulnerability comes last.
//! - **Filtering**: [`apply_vex`] removes the SARIF results a document marks
//!   `not_affected` or `fixed`.
//! - **Attestation**: [`Attestation`] binds a document to the artifacts it
//!   talks about, and [`verify_image_subjects`] checks the binding.
//!
//! [`VexCtl`] strings these together the way the `vex-tools` binary does.
//!
//! ## Getting Started
//!
//! ### Merging documents
//!
//! ```no_run
//! use std::path::Path;
//! use vex_tools::{merge, parse_vex_file, MergeOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let docs = vec![
//!         parse_vex_file(Path::new("vex/base.openvex.json"))?,
//!         parse_vex_file(Path::new("vex/hotfix.openvex.json"))?,
//!     ];
//!
//!     let opts = MergeOptions::new()
//!         .author("Security Team")
//!         .vulnerabilities(["CVE-2023-1234"]);
//!     let merged = merge(&opts, &docs)?;
//!
//!     for stmt in &merged.statements {
//!         println!("{} -> {}", stmt.vulnerability.name, stmt.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Filtering a scanner report
//!
//! ```no_run
//! use std::path::Path;
//! use vex_tools::{apply_vex, parse_vex_file};
//! use vex_tools::reports::parse_sarif_file;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = parse_sarif_file(Path::new("scan.sarif.json"))?;
//!     let vex = parse_vex_file(Path::new("app.openvex.json"))?;
//!
//!     let filtered = apply_vex(&report, &[vex])?;
//!     println!(
//!         "{} of {} findings remain",
//!         filtered.result_count(),
//!         report.result_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `vex-tools` library crate. The `vex-tools`
//! binary exposes the same operations as `merge`, `filter`, `products`,
//! `attest` and `verify` subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors sections would repeat the VexError variant docs
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Names like `doc`/`docs` are clear in context
    clippy::similar_names
)]

pub mod attestation;
pub mod cli;
pub mod config;
pub mod ctl;
pub mod error;
pub mod matching;
pub mod merge;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use attestation::{
    build_subjects, read_signed_vex, verify_image_subjects, Attestation, DigestResolver,
    DsseEnvelope, KnownDigestResolver, Subject,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use ctl::{DefaultImplementation, VexCtl, VexImplementation};
pub use error::{ErrorContext, OptionContext, Result, VexError};
pub use matching::{list_document_products, normalize_products, NormalizedProducts, ProductRef};
pub use merge::{merge, MergeOptions};
pub use model::{Product, Statement, Status, Vulnerability, VexDocument};
pub use parsers::{load_files, parse_vex_file, parse_vex_str};
pub use reports::{apply_single_vex, apply_vex, SarifReport};
