//! VEX document loading.
//!
//! This module is the document source for the rest of the crate: it turns
//! OpenVEX JSON (from a string or a file) into a [`VexDocument`] and tells
//! callers whether a location names a local file or a container image.
//!
//! ## Usage
//!
//! ```no_run
//! use vex_tools::parsers::{parse_vex_file, source_type, SourceType};
//! use std::path::Path;
//!
//! let location = "vex/app.openvex.json";
//! if source_type(location)? == SourceType::File {
//!     let doc = parse_vex_file(Path::new(location))?;
//!     println!("{} statements", doc.statements.len());
//! }
//! # Ok::<(), vex_tools::VexError>(())
//! ```

mod openvex;
mod source;

pub use openvex::{load_files, parse_vex_file, parse_vex_str};
pub use source::{source_type, SourceType};
