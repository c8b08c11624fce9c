//! In-memory OpenVEX document model.
//!
//! Documents are plain values: loaders produce them, the merge, filter and
//! attestation operations read them, and nothing in this crate mutates a
//! document it was handed. Merging always builds a new [`VexDocument`].
//!
//! ```ignore
//! let doc = parse_vex_file(&path)?;
//! for stmt in doc.statements_by_vulnerability("CVE-2021-44228") {
//!     println!("{} -> {}", stmt.vulnerability.name, stmt.status);
//! }
//! ```

mod document;
mod product;
mod statement;

pub use document::*;
pub use product::*;
pub use statement::*;
