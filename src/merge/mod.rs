//! Merging of VEX documents.
//!
//! [`merge`] folds any number of documents into a single new document:
//! statements are optionally filtered by product and vulnerability, undated
//! statements inherit their source document's timestamp, and the result is
//! sorted so the most recent statement about a vulnerability comes last.
//! Unless an ID is supplied, the merged document's ID is derived from the
//! input IDs, so merging the same documents in any order yields the same ID.

mod engine;
mod options;

pub use engine::{derive_document_id, merge};
pub use options::MergeOptions;
